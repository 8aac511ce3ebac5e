use crate::format::DocumentFormat;
use serde::{Deserialize, Serialize};

/// Default slice size fed to the scanner (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Default resident-memory ceiling (100 MB)
pub const DEFAULT_MAX_MEMORY_BYTES: u64 = 100 * 1024 * 1024;

/// Sections kept when the memory ceiling is approached
pub const DEFAULT_RETAINED_SECTIONS: usize = 10;

/// Minimum spacing between two `parsing` progress events
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 100;

/// Configuration for a streaming parse run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Bytes read from the source per scanner call
    pub chunk_size: usize,

    /// Resident-memory ceiling for buffered input plus retained sections
    pub max_memory_bytes: u64,

    /// Ring capacity applied once the memory ceiling is approached
    pub retained_sections_under_pressure: usize,

    /// Assemble sections in fixed priority order instead of arrival order
    pub prioritize_endpoints: bool,

    /// Throttle window for `parsing` progress events
    pub progress_interval_ms: u64,

    /// Force a format instead of detecting it
    pub format: Option<DocumentFormat>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_memory_bytes: DEFAULT_MAX_MEMORY_BYTES,
            retained_sections_under_pressure: DEFAULT_RETAINED_SECTIONS,
            prioritize_endpoints: true,
            progress_interval_ms: DEFAULT_PROGRESS_INTERVAL_MS,
            format: None,
        }
    }
}

impl ParseOptions {
    /// Larger slices for multi-megabyte documents
    pub fn for_large_documents() -> Self {
        Self {
            chunk_size: 256 * 1024,
            max_memory_bytes: 512 * 1024 * 1024,
            ..Default::default()
        }
    }

    /// Small slices and a tight ceiling for constrained hosts
    pub fn low_memory() -> Self {
        Self {
            chunk_size: 16 * 1024,
            max_memory_bytes: 16 * 1024 * 1024,
            ..Default::default()
        }
    }

    /// Builder: set chunk size
    #[must_use]
    pub const fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Builder: force a document format
    #[must_use]
    pub const fn format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be > 0".to_string());
        }

        if self.max_memory_bytes == 0 {
            return Err("max_memory_bytes must be > 0".to_string());
        }

        if self.retained_sections_under_pressure == 0 {
            return Err("retained_sections_under_pressure must be > 0".to_string());
        }

        Ok(())
    }

    /// Byte level at which the orchestrator starts evicting sections
    #[must_use]
    pub fn pressure_threshold(&self) -> u64 {
        self.max_memory_bytes / 10 * 9
    }
}
