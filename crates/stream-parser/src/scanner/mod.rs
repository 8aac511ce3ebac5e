//! Incremental section scanners.
//!
//! A scan session owns its buffer and nesting state explicitly, so any number
//! of documents can be scanned side by side. Each call consumes one arbitrary
//! slice of input and returns the sections that closed inside it.

mod json;
mod yaml;

pub use json::JsonScanner;
pub use yaml::YamlScanner;

use crate::format::DocumentFormat;
use crate::types::ParsedSection;
use serde::Serialize;

/// Structural irregularities observed while scanning.
///
/// The scanners never fail on malformed input; they skip what they cannot
/// use and count it here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanDiagnostics {
    /// Closing delimiters seen at depth zero
    pub unmatched_closers: usize,
    /// Closed sections whose text did not deserialize
    pub invalid_sections: usize,
    /// Input ended inside an open structure or string
    pub unterminated: bool,
}

impl ScanDiagnostics {
    pub fn is_clean(&self) -> bool {
        self == &Self::default()
    }

    /// Human-readable warnings for result metadata
    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.unmatched_closers > 0 {
            out.push(format!(
                "ignored {} unmatched closing delimiter(s)",
                self.unmatched_closers
            ));
        }
        if self.invalid_sections > 0 {
            out.push(format!(
                "skipped {} section(s) that failed to deserialize",
                self.invalid_sections
            ));
        }
        if self.unterminated {
            out.push("document ended inside an unclosed structure".to_string());
        }
        out
    }
}

/// Open scan handle for one document
#[derive(Debug)]
pub enum ScanSession {
    Json(JsonScanner),
    Yaml(YamlScanner),
}

impl ScanSession {
    /// Open a fresh session for the given format
    pub fn open(format: DocumentFormat) -> Self {
        match format {
            DocumentFormat::Json => Self::Json(JsonScanner::new()),
            DocumentFormat::Yaml => Self::Yaml(YamlScanner::new()),
        }
    }

    pub fn format(&self) -> DocumentFormat {
        match self {
            Self::Json(_) => DocumentFormat::Json,
            Self::Yaml(_) => DocumentFormat::Yaml,
        }
    }

    /// Feed one slice; returns sections completed by it, in document order
    pub fn scan(&mut self, chunk: &[u8]) -> Vec<ParsedSection> {
        match self {
            Self::Json(scanner) => scanner.scan(chunk),
            Self::Yaml(scanner) => scanner.scan(chunk),
        }
    }

    /// Signal end of input; returns any section only closable at EOF
    pub fn finish(&mut self) -> Vec<ParsedSection> {
        match self {
            Self::Json(scanner) => scanner.finish(),
            Self::Yaml(scanner) => scanner.finish(),
        }
    }

    /// Bytes currently held for sections that have not closed yet
    pub fn buffered_bytes(&self) -> usize {
        match self {
            Self::Json(scanner) => scanner.buffered_bytes(),
            Self::Yaml(scanner) => scanner.buffered_bytes(),
        }
    }

    /// Top-level `openapi` / `swagger` value, once seen
    pub fn openapi_version(&self) -> Option<&str> {
        match self {
            Self::Json(scanner) => scanner.openapi_version(),
            Self::Yaml(scanner) => scanner.openapi_version(),
        }
    }

    pub fn diagnostics(&self) -> &ScanDiagnostics {
        match self {
            Self::Json(scanner) => scanner.diagnostics(),
            Self::Yaml(scanner) => scanner.diagnostics(),
        }
    }
}

/// Keys whose top-level scalar value is the OpenAPI or Swagger version
pub(crate) fn is_version_key(key: &str) -> bool {
    matches!(key, "openapi" | "swagger")
}
