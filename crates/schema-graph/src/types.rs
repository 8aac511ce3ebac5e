use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema name → names it references directly, in first-seen order
pub type DependencyMap = BTreeMap<String, Vec<String>>;

/// Derived figures for one named schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMetrics {
    pub complexity: usize,
    pub depth: usize,
    pub property_count: usize,
    pub required_count: usize,
    pub dependency_count: usize,
    pub circular_refs: bool,
}

/// Property whose declared type differs between two schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMismatch {
    pub property: String,
    pub left: Option<String>,
    pub right: Option<String>,
}

/// Structural comparison of two schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityReport {
    /// 0–100, 60% property-name Jaccard + 40% shared-type agreement
    pub score: u8,
    pub shared: Vec<String>,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
}
