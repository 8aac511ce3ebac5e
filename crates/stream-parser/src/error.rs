use thiserror::Error;

/// Result type for stream parsing operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Errors that abort a parse run.
///
/// Structural problems in the document are not errors: the scanner is
/// lenient and records them as diagnostics instead.
#[derive(Error, Debug)]
pub enum StreamError {
    /// The underlying source could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The run was cancelled through its cancellation token
    #[error("Parse cancelled")]
    Cancelled,

    /// Invalid parse options
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl StreamError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Stable short code for envelopes and logs
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_error",
            Self::Cancelled => "cancelled",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}
