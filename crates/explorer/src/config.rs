use apiscope_stream_parser::ParseOptions;
use serde::{Deserialize, Serialize};

/// Default caller-side size ceiling (50 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const ENV_MAX_FILE_SIZE: &str = "APISCOPE_MAX_FILE_SIZE";
pub const ENV_CHUNK_SIZE: &str = "APISCOPE_CHUNK_SIZE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Sources above this size are rejected before parsing
    pub max_file_size: u64,
    pub http_timeout_secs: u64,
    pub parse: ParseOptions,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            parse: ParseOptions::default(),
        }
    }
}

impl LoaderConfig {
    /// Defaults with `APISCOPE_*` environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(size) = parse_positive(ENV_MAX_FILE_SIZE, lookup(ENV_MAX_FILE_SIZE)) {
            self.max_file_size = size;
        }
        if let Some(chunk) = parse_positive(ENV_CHUNK_SIZE, lookup(ENV_CHUNK_SIZE)) {
            self.parse.chunk_size = chunk as usize;
        }
        self
    }
}

fn parse_positive(key: &str, raw: Option<String>) -> Option<u64> {
    let raw = raw?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            log::warn!("ignoring {key}={raw:?}: expected a positive integer");
            None
        }
    }
}
