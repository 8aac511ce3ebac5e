//! # apiscope explorer
//!
//! The query layer shared by the MCP server and the CLI: load a document
//! from a URL, a file or inline text, then search its endpoints, inspect
//! its schemas and summarise it.
//!
//! ```text
//! "https://…" | "./spec.yaml" | "openapi: 3.0.0 …"
//!     │
//!     ├──> SpecSource::classify ──> SpecLoader (size ceiling, HTTP fetch)
//!     │                                 └─> StreamParser
//!     │
//!     └──> LoadedSpec (ParseResult + SchemaAnalysis)
//!            ├─ search_endpoints
//!            ├─ schema_detail / compare
//!            └─ compute_analytics
//! ```

mod analytics;
mod config;
mod error;
mod loader;
mod search;
mod session;

pub use analytics::{
    compute_analytics, ApiAnalytics, EndpointAnalytics, RankedSchema, SchemaAnalytics,
    TOP_SCHEMAS,
};
pub use config::{
    LoaderConfig, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_FILE_SIZE, ENV_CHUNK_SIZE,
    ENV_MAX_FILE_SIZE,
};
pub use error::{ExplorerError, Result};
pub use loader::{SpecLoader, SpecSource};
pub use search::{
    search_endpoints, EndpointQuery, EndpointSummary, SearchResults, DEFAULT_SEARCH_LIMIT,
};
pub use session::{LoadedSpec, SchemaDetail, SpecSummary};
