use crate::dependencies::build_dependency_map;
use crate::error::{Result, SchemaGraphError};
use crate::graph::SchemaGraph;
use crate::metrics::compute_metrics;
use crate::types::{DependencyMap, SchemaMetrics};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Everything derived from one schema map, computed in a single pass.
///
/// Rebuilt whole whenever the map changes.
#[derive(Debug, Clone, Default)]
pub struct SchemaAnalysis {
    dependencies: DependencyMap,
    metrics: BTreeMap<String, SchemaMetrics>,
    graph: SchemaGraph,
}

impl SchemaAnalysis {
    pub fn build(schemas: &Map<String, Value>) -> Self {
        let dependencies = build_dependency_map(schemas);
        let metrics = schemas
            .iter()
            .map(|(name, schema)| {
                (
                    name.clone(),
                    compute_metrics(name, schema, schemas, &dependencies),
                )
            })
            .collect();
        let graph = SchemaGraph::from_dependencies(&dependencies);
        log::debug!("analyzed {} schemas", schemas.len());
        Self {
            dependencies,
            metrics,
            graph,
        }
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn dependencies(&self) -> &DependencyMap {
        &self.dependencies
    }

    pub fn graph(&self) -> &SchemaGraph {
        &self.graph
    }

    pub fn all_metrics(&self) -> &BTreeMap<String, SchemaMetrics> {
        &self.metrics
    }

    pub fn metrics(&self, name: &str) -> Result<&SchemaMetrics> {
        self.metrics
            .get(name)
            .ok_or_else(|| SchemaGraphError::SchemaNotFound(name.to_string()))
    }

    /// Names flagged `circular_refs`, sorted
    pub fn circular_schemas(&self) -> Vec<&str> {
        self.metrics
            .iter()
            .filter(|(_, m)| m.circular_refs)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Highest complexity first; ties by name
    pub fn most_complex(&self, limit: usize) -> Vec<(&str, &SchemaMetrics)> {
        let mut ranked: Vec<(&str, &SchemaMetrics)> = self
            .metrics
            .iter()
            .map(|(name, m)| (name.as_str(), m))
            .collect();
        ranked.sort_by(|a, b| b.1.complexity.cmp(&a.1.complexity).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn average_complexity(&self) -> f64 {
        if self.metrics.is_empty() {
            return 0.0;
        }
        let total: usize = self.metrics.values().map(|m| m.complexity).sum();
        total as f64 / self.metrics.len() as f64
    }
}
