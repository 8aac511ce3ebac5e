use apiscope_schema_graph::SchemaGraphError;
use apiscope_stream_parser::StreamError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExplorerError>;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Source is {size} bytes, above the {limit} byte limit")]
    TooLarge { size: u64, limit: u64 },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Endpoint not found: {method} {path}")]
    EndpointNotFound { method: String, path: String },

    #[error(transparent)]
    Schema(#[from] SchemaGraphError),

    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

impl ExplorerError {
    /// Stable short code for error envelopes
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TooLarge { .. } => "too_large",
            Self::Http(_) | Self::HttpStatus { .. } => "fetch_failed",
            Self::Stream(err) => err.code(),
            Self::Io(_) => "io_error",
            Self::EndpointNotFound { .. } => "endpoint_not_found",
            Self::Schema(SchemaGraphError::SchemaNotFound(_)) => "schema_not_found",
            Self::InvalidSource(_) => "invalid_source",
        }
    }

    /// Short remediation hint, where one is useful
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TooLarge { .. } => Some("Raise APISCOPE_MAX_FILE_SIZE or load a smaller document"),
            Self::EndpointNotFound { .. } => Some("Use search_endpoints to list available endpoints"),
            Self::Schema(_) => Some("Use list_schemas to list available schema names"),
            Self::InvalidSource(_) => Some("Pass a URL, a file path, or the document text itself"),
            _ => None,
        }
    }
}
