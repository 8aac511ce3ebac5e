//! apiscope MCP server
//!
//! Exposes OpenAPI document analysis to AI agents over the Model Context
//! Protocol.
//!
//! ## Tools
//!
//! - `load_openapi_spec` - Load a document from a URL, file or inline text
//! - `search_endpoints` - Filter endpoints by text, method, tag, complexity
//! - `get_endpoint_details` - Full record for one operation
//! - `get_api_analytics` - Endpoint and schema statistics
//! - `list_schemas` - Every schema with its metrics
//! - `analyze_schema` - One schema with dependencies and dependents
//! - `compare_schemas` - Compatibility score between two schemas

mod service;

pub use service::{
    AnalyzeSchemaRequest, ApiScopeService, CompareSchemasRequest, EmptyRequest,
    EndpointDetailsRequest, LoadSpecRequest, SchemaList, SchemaListing, SearchEndpointsRequest,
    NO_SPEC_LOADED,
};
