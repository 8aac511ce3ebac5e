use super::{is_version_key, ScanDiagnostics};
use crate::types::{ParsedSection, SectionKind};
use serde_json::Value;

/// Byte-level JSON section scanner.
///
/// Tracks nesting depth over `{}`/`[]`, string state with escapes, and the
/// key/value position of the document root. A recognised section is emitted
/// when the value opened under its key closes back to depth 1. All state
/// survives between calls, so chunk boundaries may fall anywhere, including
/// inside strings, escapes, or multi-byte characters.
#[derive(Debug, Default)]
pub struct JsonScanner {
    buffer: Vec<u8>,
    cursor: usize,
    depth: usize,
    in_string: bool,
    escaped: bool,
    /// Opening quote of a root-level string still being read
    root_string_start: Option<usize>,
    expecting_key: bool,
    current_key: Option<String>,
    /// Section whose value opened at this buffer offset
    open_section: Option<(SectionKind, usize)>,
    version: Option<String>,
    diagnostics: ScanDiagnostics,
    emitted: usize,
}

impl JsonScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan(&mut self, chunk: &[u8]) -> Vec<ParsedSection> {
        self.buffer.extend_from_slice(chunk);
        let mut sections = Vec::new();

        while self.cursor < self.buffer.len() {
            let idx = self.cursor;
            let byte = self.buffer[idx];
            self.cursor += 1;

            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if byte == b'\\' {
                    self.escaped = true;
                } else if byte == b'"' {
                    self.in_string = false;
                    if let Some(start) = self.root_string_start.take() {
                        self.on_root_string(start, idx);
                    }
                }
                continue;
            }

            match byte {
                b'"' => {
                    self.in_string = true;
                    if self.depth == 1 {
                        self.root_string_start = Some(idx);
                    }
                }
                b'{' | b'[' => {
                    if self.depth == 1 {
                        self.open_section = self
                            .current_key
                            .as_deref()
                            .and_then(SectionKind::from_key)
                            .map(|kind| (kind, idx));
                    }
                    self.depth += 1;
                    if self.depth == 1 {
                        self.expecting_key = byte == b'{';
                    }
                }
                b'}' | b']' => {
                    if self.depth == 0 {
                        self.diagnostics.unmatched_closers += 1;
                        log::debug!("ignoring unmatched '{}' at offset {idx}", byte as char);
                        continue;
                    }
                    self.depth -= 1;
                    if self.depth == 1 {
                        if let Some((kind, start)) = self.open_section.take() {
                            if let Some(section) = self.emit(kind, start, idx) {
                                sections.push(section);
                            }
                        }
                    }
                }
                b':' if self.depth == 1 => self.expecting_key = false,
                b',' if self.depth == 1 => self.expecting_key = true,
                _ => {}
            }
        }

        self.compact();
        sections
    }

    /// JSON sections always close on their own delimiter, so EOF emits
    /// nothing; it only records whether the document was left open.
    pub fn finish(&mut self) -> Vec<ParsedSection> {
        if self.depth > 0 || self.in_string {
            self.diagnostics.unterminated = true;
            log::warn!(
                "JSON input ended at depth {} (in string: {})",
                self.depth,
                self.in_string
            );
        }
        self.buffer.clear();
        self.cursor = 0;
        self.open_section = None;
        self.root_string_start = None;
        Vec::new()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    pub fn openapi_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn diagnostics(&self) -> &ScanDiagnostics {
        &self.diagnostics
    }

    fn on_root_string(&mut self, start: usize, end: usize) {
        let Ok(text) = serde_json::from_slice::<String>(&self.buffer[start..=end]) else {
            return;
        };
        if self.expecting_key {
            self.current_key = Some(text);
        } else if self.current_key.as_deref().is_some_and(is_version_key) {
            self.version = Some(text);
        }
    }

    fn emit(&mut self, kind: SectionKind, start: usize, end: usize) -> Option<ParsedSection> {
        let raw = &self.buffer[start..=end];
        match serde_json::from_slice::<Value>(raw) {
            Ok(payload) => {
                let sequence = self.emitted;
                self.emitted += 1;
                log::debug!("emitting section '{}' ({} bytes)", kind.as_str(), raw.len());
                Some(ParsedSection::new(kind, payload, raw.len(), sequence))
            }
            Err(err) => {
                self.diagnostics.invalid_sections += 1;
                log::warn!("skipping section '{}': {err}", kind.as_str());
                None
            }
        }
    }

    /// Drop every byte no pending section or root string still refers to.
    fn compact(&mut self) {
        let keep_from = match (self.open_section, self.root_string_start) {
            (Some((_, start)), _) => start,
            (None, Some(start)) => start,
            (None, None) => self.cursor,
        };
        if keep_from == 0 {
            return;
        }
        self.buffer.drain(..keep_from);
        self.cursor -= keep_from;
        if let Some((_, start)) = self.open_section.as_mut() {
            *start -= keep_from;
        }
        if let Some(start) = self.root_string_start.as_mut() {
            *start -= keep_from;
        }
    }
}
