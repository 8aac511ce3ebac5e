use serde::{Deserialize, Serialize};
use std::path::Path;

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialization format of an OpenAPI document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Sniff the format of in-memory text.
    ///
    /// `{` or `[` means JSON. Anything else (including the canonical
    /// `openapi:` / `swagger:` prefixes) is treated as YAML.
    pub fn sniff(text: &str) -> Self {
        Self::sniff_bytes(text.as_bytes())
    }

    pub fn sniff_bytes(bytes: &[u8]) -> Self {
        Self::sniff_prefix(bytes).unwrap_or(Self::Yaml)
    }

    /// Sniff the leading bytes of a stream.
    ///
    /// `None` until the first non-whitespace byte after an optional BOM has
    /// been seen, so the decision never depends on where a read slice ends.
    pub fn sniff_prefix(bytes: &[u8]) -> Option<Self> {
        if !bytes.is_empty() && BOM.len() > bytes.len() && BOM.starts_with(bytes) {
            return None;
        }
        let bytes = bytes.strip_prefix(BOM).unwrap_or(bytes);
        match bytes.iter().find(|b| !b.is_ascii_whitespace())? {
            b'{' | b'[' => Some(Self::Json),
            _ => Some(Self::Yaml),
        }
    }

    /// True when the text looks like an OpenAPI/Swagger document at all
    pub fn looks_like_document(text: &str) -> bool {
        let trimmed = text.trim_start_matches('\u{feff}').trim_start();
        trimmed.starts_with('{')
            || trimmed.starts_with('[')
            || trimmed.starts_with("openapi:")
            || trimmed.starts_with("swagger:")
            || trimmed.starts_with("---")
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}
