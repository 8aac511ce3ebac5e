use crate::error::{ExplorerError, Result};
use apiscope_protocol::ParseMetadata;
use apiscope_schema_graph::{
    compare_schemas, refs, CompatibilityReport, SchemaAnalysis, SchemaGraphError, SchemaMetrics,
};
use apiscope_stream_parser::{AssembledSpecification, EndpointRecord, HttpMethod, ParseResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// A parsed document together with its schema analysis
#[derive(Debug, Clone)]
pub struct LoadedSpec {
    source: String,
    result: ParseResult,
    analysis: SchemaAnalysis,
}

/// Headline facts about a loaded document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSummary {
    pub source: String,
    pub title: Option<String>,
    pub version: Option<String>,
    pub openapi_version: Option<String>,
    pub endpoint_count: usize,
    pub schema_count: usize,
    pub metadata: ParseMetadata,
}

/// One schema with its metrics and graph neighbourhood
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDetail {
    pub name: String,
    pub schema: Value,
    pub metrics: SchemaMetrics,
    pub dependencies: Vec<String>,
    pub dependents: Vec<String>,
    /// Every schema reachable through references
    pub reachable: Vec<String>,
}

impl LoadedSpec {
    pub fn new(source: impl Into<String>, result: ParseResult) -> Self {
        let analysis = result
            .spec
            .schemas()
            .map(SchemaAnalysis::build)
            .unwrap_or_default();
        Self {
            source: source.into(),
            result,
            analysis,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn spec(&self) -> &AssembledSpecification {
        &self.result.spec
    }

    pub fn endpoints(&self) -> &[EndpointRecord] {
        &self.result.endpoints
    }

    pub fn metadata(&self) -> &ParseMetadata {
        &self.result.metadata
    }

    pub fn analysis(&self) -> &SchemaAnalysis {
        &self.analysis
    }

    pub fn summary(&self) -> SpecSummary {
        let spec = self.spec();
        SpecSummary {
            source: self.source.clone(),
            title: spec.title().map(str::to_string),
            version: spec.api_version().map(str::to_string),
            openapi_version: spec.openapi_version.clone(),
            endpoint_count: self.result.endpoints.len(),
            schema_count: spec.schema_count(),
            metadata: self.result.metadata.clone(),
        }
    }

    pub fn endpoint(&self, method: HttpMethod, path: &str) -> Result<&EndpointRecord> {
        self.result
            .endpoints
            .iter()
            .find(|e| e.method == method && e.path == path)
            .ok_or_else(|| ExplorerError::EndpointNotFound {
                method: method.to_string(),
                path: path.to_string(),
            })
    }

    /// Sorted schema names
    pub fn schema_names(&self) -> Vec<&str> {
        self.analysis.all_metrics().keys().map(String::as_str).collect()
    }

    pub fn schema(&self, name: &str) -> Result<&Value> {
        self.spec()
            .schemas()
            .and_then(|schemas| schemas.get(name))
            .ok_or_else(|| SchemaGraphError::SchemaNotFound(name.to_string()).into())
    }

    pub fn schema_detail(&self, name: &str) -> Result<SchemaDetail> {
        let schema = self.schema(name)?.clone();
        let metrics = self.analysis.metrics(name)?.clone();
        let graph = self.analysis.graph();
        Ok(SchemaDetail {
            name: name.to_string(),
            schema,
            metrics,
            dependencies: graph.dependencies(name)?,
            dependents: graph.dependents(name)?,
            reachable: graph.transitive_dependencies(name)?,
        })
    }

    /// Compare two named schemas, following a top-level `$ref` on either
    pub fn compare(&self, left: &str, right: &str) -> Result<CompatibilityReport> {
        let empty = Map::new();
        let schemas = self.spec().schemas().unwrap_or(&empty);
        let left = refs::resolve(self.schema(left)?, schemas);
        let right = refs::resolve(self.schema(right)?, schemas);
        Ok(compare_schemas(left, right))
    }
}
