//! MCP tools over the apiscope explorer
//!
//! One document is loaded per server session. Every tool other than
//! `load_openapi_spec` answers from that document.

use apiscope_explorer::{
    compute_analytics, search_endpoints, EndpointQuery, ExplorerError, LoadedSpec, LoaderConfig,
    SpecLoader, SpecSource,
};
use apiscope_protocol::{serialize_json_pretty, ErrorEnvelope};
use apiscope_schema_graph::SchemaMetrics;
use apiscope_stream_parser::{Complexity, HttpMethod};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error code returned before any document has been loaded
pub const NO_SPEC_LOADED: &str = "no_spec_loaded";

/// apiscope MCP service
#[derive(Clone)]
pub struct ApiScopeService {
    loader: SpecLoader,
    /// Document loaded in this session
    spec: Arc<RwLock<Option<LoadedSpec>>>,
    tool_router: ToolRouter<Self>,
}

impl ApiScopeService {
    pub fn new(config: LoaderConfig) -> Result<Self, ExplorerError> {
        Ok(Self {
            loader: SpecLoader::new(config)?,
            spec: Arc::new(RwLock::new(None)),
            tool_router: Self::tool_router(),
        })
    }
}

#[tool_handler]
impl ServerHandler for ApiScopeService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("apiscope analyses OpenAPI and Swagger documents. Call 'load_openapi_spec' first with a URL, a file path or the document text, then use 'search_endpoints', 'get_endpoint_details', 'get_api_analytics', 'list_schemas', 'analyze_schema' and 'compare_schemas'.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Tool Request Types
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadSpecRequest {
    /// URL, file path, or document text
    #[schemars(description = "URL (http/https), a local file path, or the OpenAPI/Swagger document itself as JSON or YAML text")]
    pub source: String,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct SearchEndpointsRequest {
    #[schemars(description = "Case-insensitive text matched against path, summary, description, operationId and tags")]
    pub query: Option<String>,

    #[schemars(description = "HTTP method filter (get, post, put, delete, patch, head, options, trace)")]
    pub method: Option<String>,

    #[schemars(description = "Tag filter (case-insensitive)")]
    pub tag: Option<String>,

    #[schemars(description = "Complexity filter: low, medium or high")]
    pub complexity: Option<String>,

    #[schemars(description = "Only deprecated (true) or only active (false) endpoints")]
    pub deprecated: Option<bool>,

    #[schemars(description = "Maximum endpoints returned (default: 50)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EndpointDetailsRequest {
    #[schemars(description = "HTTP method, e.g. 'get'")]
    pub method: String,

    #[schemars(description = "Path template exactly as written in the document, e.g. '/pets/{id}'")]
    pub path: String,
}

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeSchemaRequest {
    #[schemars(description = "Schema name under components.schemas (or Swagger definitions)")]
    pub name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompareSchemasRequest {
    #[schemars(description = "First schema name")]
    pub left: String,

    #[schemars(description = "Second schema name")]
    pub right: String,
}

// ============================================================================
// Tool Result Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SchemaListing<'a> {
    pub name: &'a str,
    pub metrics: &'a SchemaMetrics,
}

#[derive(Debug, Serialize)]
pub struct SchemaList<'a> {
    pub total: usize,
    pub schemas: Vec<SchemaListing<'a>>,
}

// ============================================================================
// Helpers
// ============================================================================

fn json_result<T: Serialize>(value: &T) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(value).unwrap_or_default(),
    )])
}

fn envelope_result(envelope: &ErrorEnvelope) -> CallToolResult {
    CallToolResult::error(vec![Content::text(
        serialize_json_pretty(envelope).unwrap_or_default(),
    )])
}

fn explorer_error(err: &ExplorerError) -> CallToolResult {
    let mut envelope = ErrorEnvelope::new(err.code(), err.to_string());
    if let Some(hint) = err.hint() {
        envelope = envelope.with_hint(hint);
    }
    envelope_result(&envelope)
}

fn no_spec_loaded() -> CallToolResult {
    envelope_result(
        &ErrorEnvelope::new(NO_SPEC_LOADED, "No OpenAPI document is loaded")
            .with_hint("Call load_openapi_spec first"),
    )
}

fn parse_method(raw: &str) -> Result<HttpMethod, McpError> {
    raw.parse().map_err(|msg: String| McpError::invalid_params(msg, None))
}

fn parse_complexity(raw: &str) -> Result<Complexity, McpError> {
    raw.parse().map_err(|msg: String| McpError::invalid_params(msg, None))
}

// ============================================================================
// Tools
// ============================================================================

#[tool_router]
impl ApiScopeService {
    /// Load a document, replacing the one held by this session
    #[tool(description = "Load an OpenAPI 3.x or Swagger 2.0 document from a URL, a file path or inline JSON/YAML text. Returns title, version, endpoint and schema counts, and parse metadata. Required before every other tool.")]
    pub async fn load_openapi_spec(
        &self,
        Parameters(request): Parameters<LoadSpecRequest>,
    ) -> Result<CallToolResult, McpError> {
        let source = match SpecSource::classify(&request.source) {
            Ok(source) => source,
            Err(err) => return Ok(explorer_error(&err)),
        };
        let parser = match self.loader.parser() {
            Ok(parser) => parser.with_progress(|event| {
                log::debug!(
                    "{} {:.0}%: {}",
                    event.stage.as_str(),
                    event.percentage,
                    event.message
                );
            }),
            Err(err) => return Ok(explorer_error(&err)),
        };

        let loaded = match self.loader.load_with(&source, parser).await {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("load_openapi_spec failed for {source}: {err}");
                return Ok(explorer_error(&err));
            }
        };
        let summary = loaded.summary();
        log::info!(
            "loaded {} ({} endpoints, {} schemas)",
            summary.source,
            summary.endpoint_count,
            summary.schema_count
        );
        *self.spec.write().await = Some(loaded);
        Ok(json_result(&summary))
    }

    #[tool(description = "Search endpoints of the loaded document by text, method, tag, complexity and deprecation. Returns the total match count and the first `limit` matches in document order.")]
    pub async fn search_endpoints(
        &self,
        Parameters(request): Parameters<SearchEndpointsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let query = EndpointQuery {
            query: request.query,
            method: request.method.as_deref().map(parse_method).transpose()?,
            tag: request.tag,
            complexity: request
                .complexity
                .as_deref()
                .map(parse_complexity)
                .transpose()?,
            deprecated: request.deprecated,
            limit: request.limit,
        };

        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        Ok(json_result(&search_endpoints(loaded.endpoints(), &query)))
    }

    #[tool(description = "Get everything known about one endpoint: parameters, request body, responses, security, tags and the complexity / business context / response time estimates.")]
    pub async fn get_endpoint_details(
        &self,
        Parameters(request): Parameters<EndpointDetailsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let method = parse_method(&request.method)?;

        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        match loaded.endpoint(method, &request.path) {
            Ok(endpoint) => Ok(json_result(endpoint)),
            Err(err) => Ok(explorer_error(&err)),
        }
    }

    #[tool(description = "Summarise the loaded document: endpoint counts by method, complexity, business context and response time, tag usage, and schema complexity / reference rankings with circular schemas.")]
    pub async fn get_api_analytics(
        &self,
        Parameters(_request): Parameters<EmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        Ok(json_result(&compute_analytics(loaded)))
    }

    #[tool(description = "List every schema of the loaded document with its complexity, depth, property counts, dependency count and circular-reference flag.")]
    pub async fn list_schemas(
        &self,
        Parameters(_request): Parameters<EmptyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        let schemas: Vec<SchemaListing<'_>> = loaded
            .analysis()
            .all_metrics()
            .iter()
            .map(|(name, metrics)| SchemaListing { name, metrics })
            .collect();
        Ok(json_result(&SchemaList {
            total: schemas.len(),
            schemas,
        }))
    }

    #[tool(description = "Analyse one schema: its definition, metrics, the schemas it references and the schemas that reference it.")]
    pub async fn analyze_schema(
        &self,
        Parameters(request): Parameters<AnalyzeSchemaRequest>,
    ) -> Result<CallToolResult, McpError> {
        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        match loaded.schema_detail(&request.name) {
            Ok(detail) => Ok(json_result(&detail)),
            Err(err) => Ok(explorer_error(&err)),
        }
    }

    #[tool(description = "Score how compatible two schemas are (0-100) from shared property names and agreeing property types. Lists shared, one-sided and type-mismatched properties.")]
    pub async fn compare_schemas(
        &self,
        Parameters(request): Parameters<CompareSchemasRequest>,
    ) -> Result<CallToolResult, McpError> {
        let guard = self.spec.read().await;
        let Some(loaded) = guard.as_ref() else {
            return Ok(no_spec_loaded());
        };
        match loaded.compare(&request.left, &request.right) {
            Ok(report) => Ok(json_result(&report)),
            Err(err) => Ok(explorer_error(&err)),
        }
    }
}
