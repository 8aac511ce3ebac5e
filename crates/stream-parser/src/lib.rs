//! # apiscope stream parser
//!
//! Incremental OpenAPI / Swagger parsing for documents too large to load
//! and deserialize in one piece.
//!
//! ## Architecture
//!
//! ```text
//! Source (text / file / AsyncRead)
//!     │
//!     ├──> Format detection (forced → extension → content sniff)
//!     │
//!     ├──> StreamParser: fixed-size slices, yield + cancel check per slice
//!     │    │
//!     │    ├─> ScanSession (JSON byte machine | YAML line machine)
//!     │    │    └─> ParsedSection, emitted only once fully closed
//!     │    │
//!     │    └─> SectionRing (trimmed to N newest under memory pressure)
//!     │
//!     └──> DocumentAssembler
//!          ├─> Shallow merge per section kind
//!          └─> EndpointRecord[] + heuristics (complexity, context, latency)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use apiscope_stream_parser::{ParseOptions, StreamParser};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> apiscope_stream_parser::Result<()> {
//! let mut parser = StreamParser::new(ParseOptions::default())?
//!     .with_progress(|event| eprintln!("{:.0}% {}", event.percentage, event.message));
//!
//! let result = parser
//!     .parse_text(r#"{"openapi":"3.0.0","paths":{"/x":{"get":{"summary":"s"}}}}"#)
//!     .await?;
//! assert_eq!(result.endpoints[0].key(), "GET /x");
//! # Ok(())
//! # }
//! ```

mod assembler;
mod config;
mod error;
mod format;
pub mod heuristics;
mod orchestrator;
mod ring;
pub mod scanner;
mod types;

pub use assembler::{extract_endpoints, DocumentAssembler};
pub use config::{
    ParseOptions, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_MEMORY_BYTES, DEFAULT_PROGRESS_INTERVAL_MS,
    DEFAULT_RETAINED_SECTIONS,
};
pub use error::{Result, StreamError};
pub use format::DocumentFormat;
pub use orchestrator::{ProgressFn, StreamParser};
pub use ring::SectionRing;
pub use scanner::{ScanDiagnostics, ScanSession};
pub use types::{
    AssembledSpecification, Complexity, EndpointRecord, HttpMethod, ParseResult, ParsedSection,
    ResponseTime, SectionKind,
};

pub use apiscope_protocol::{ParseMetadata, ProgressEvent, ProgressStage};
