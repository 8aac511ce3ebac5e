use super::{is_version_key, ScanDiagnostics};
use crate::types::{ParsedSection, SectionKind};
use serde_json::Value;

/// Line-oriented YAML section scanner.
///
/// A non-indented `key:` line opens a top-level section; the previous one is
/// emitted at that point. The trailing partial line of every slice is held
/// back until a newline (or EOF) completes it.
#[derive(Debug, Default)]
pub struct YamlScanner {
    /// Bytes after the last newline seen so far
    pending: Vec<u8>,
    current: Option<OpenSection>,
    version: Option<String>,
    diagnostics: ScanDiagnostics,
    emitted: usize,
}

#[derive(Debug)]
struct OpenSection {
    key: String,
    lines: Vec<String>,
    byte_size: usize,
}

impl OpenSection {
    fn has_content(&self) -> bool {
        self.lines.iter().any(|line| !line.trim().is_empty())
    }

    fn retained_bytes(&self) -> usize {
        self.lines.iter().map(|line| line.len() + 1).sum()
    }
}

impl YamlScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scan(&mut self, chunk: &[u8]) -> Vec<ParsedSection> {
        self.pending.extend_from_slice(chunk);
        let mut sections = Vec::new();

        let Some(last_newline) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return sections;
        };
        let complete: Vec<u8> = self.pending.drain(..=last_newline).collect();
        let text = String::from_utf8_lossy(&complete);

        for line in text.split_terminator('\n') {
            self.process_line(line, &mut sections);
        }

        sections
    }

    /// Process the held-back last line and close the final section
    pub fn finish(&mut self) -> Vec<ParsedSection> {
        let mut sections = Vec::new();
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            let line = String::from_utf8_lossy(&rest).into_owned();
            self.process_line(&line, &mut sections);
        }
        if let Some(section) = self.close_current() {
            sections.push(section);
        }
        sections
    }

    pub fn buffered_bytes(&self) -> usize {
        self.pending.len() + self.current.as_ref().map_or(0, OpenSection::retained_bytes)
    }

    pub fn openapi_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn diagnostics(&self) -> &ScanDiagnostics {
        &self.diagnostics
    }

    fn process_line(&mut self, raw: &str, sections: &mut Vec<ParsedSection>) {
        let line = raw.strip_suffix('\r').unwrap_or(raw);

        if !starts_top_level_entry(line) {
            if let Some(current) = self.current.as_mut() {
                current.byte_size += raw.len() + 1;
                current.lines.push(line.to_string());
            }
            return;
        }

        if line == "---" || line == "..." {
            return;
        }

        if let Some(section) = self.close_current() {
            sections.push(section);
        }

        let Some((key, rest)) = split_key(line) else {
            log::debug!("ignoring top-level YAML line without a key: {line}");
            return;
        };
        let rest = strip_comment(rest).trim();

        if rest.is_empty() {
            self.current = Some(OpenSection {
                key,
                lines: Vec::new(),
                byte_size: raw.len() + 1,
            });
            return;
        }

        if is_version_key(&key) {
            self.version = Some(unquote(rest).to_string());
            return;
        }

        // Inline value such as `tags: [a, b]`. A flow collection may carry
        // on over indented lines, so it stays open like a block section.
        // Continuation lines starting at column 0 are read as new entries.
        if SectionKind::from_key(&key).is_some() {
            self.current = Some(OpenSection {
                key,
                lines: vec![format!("  {rest}")],
                byte_size: raw.len() + 1,
            });
        }
    }

    fn close_current(&mut self) -> Option<ParsedSection> {
        let section = self.current.take()?;
        let kind = SectionKind::from_key(&section.key)?;
        if !section.has_content() {
            return None;
        }
        self.emit(kind, section)
    }

    fn emit(&mut self, kind: SectionKind, section: OpenSection) -> Option<ParsedSection> {
        let mut text = String::with_capacity(section.byte_size + 16);
        text.push_str("section:\n");
        for line in &section.lines {
            text.push_str(line);
            text.push('\n');
        }

        match yaml_to_json(&text) {
            Ok(payload) => {
                let sequence = self.emitted;
                self.emitted += 1;
                log::debug!(
                    "emitting section '{}' ({} bytes)",
                    kind.as_str(),
                    section.byte_size
                );
                Some(ParsedSection::new(kind, payload, section.byte_size, sequence))
            }
            Err(err) => {
                self.diagnostics.invalid_sections += 1;
                log::warn!("skipping section '{}': {err}", kind.as_str());
                None
            }
        }
    }
}

/// Non-indented, non-empty line that is not a comment or a root-level
/// sequence item (`- x` directly under a key is still section content).
fn starts_top_level_entry(line: &str) -> bool {
    match line.as_bytes().first() {
        None => false,
        Some(b' ' | b'\t' | b'#' | b'-') => line == "---",
        Some(_) => true,
    }
}

fn split_key(line: &str) -> Option<(String, &str)> {
    let colon = find_key_colon(line)?;
    let key = unquote(line[..colon].trim());
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), &line[colon + 1..]))
}

/// Position of the `:` that ends a mapping key, skipping quoted keys
fn find_key_colon(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let search_from = match bytes.first() {
        Some(quote @ (b'"' | b'\'')) => bytes[1..].iter().position(|b| b == quote)? + 2,
        _ => 0,
    };
    bytes[search_from..]
        .iter()
        .enumerate()
        .find(|(i, b)| {
            **b == b':'
                && bytes
                    .get(search_from + i + 1)
                    .map_or(true, |next| next.is_ascii_whitespace())
        })
        .map(|(i, _)| search_from + i)
}

fn strip_comment(value: &str) -> &str {
    match value.find(" #") {
        Some(pos) if !value.trim_start().starts_with(['"', '\'']) => &value[..pos],
        _ => value,
    }
}

fn unquote(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

fn yaml_to_json(text: &str) -> Result<Value, String> {
    let document: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    let inner = match document {
        serde_yaml::Value::Mapping(mut map) => map
            .remove("section")
            .ok_or_else(|| "section wrapper missing".to_string())?,
        _ => return Err("section did not parse as a mapping".to_string()),
    };
    serde_json::to_value(inner).map_err(|e| e.to_string())
}
