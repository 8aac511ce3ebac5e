//! # apiscope schema graph
//!
//! Static analysis of an OpenAPI schema map (`components.schemas` or
//! Swagger `definitions`).
//!
//! ```text
//! schema map
//!     │
//!     ├──> Dependency map (direct $ref targets, self excluded)
//!     │
//!     ├──> Metrics per schema
//!     │      ├─ complexity / depth / property count (walk capped at 10)
//!     │      └─ circular flag (iterative DFS over the dependency map)
//!     │
//!     ├──> SchemaGraph (petgraph): dependents, SCC cycles, reference counts
//!     │
//!     └──> Pairwise compatibility (name Jaccard + type agreement)
//! ```

mod analysis;
mod compare;
mod dependencies;
mod error;
mod graph;
mod metrics;
pub mod refs;
mod types;

pub use analysis::SchemaAnalysis;
pub use compare::{compare_schemas, compatibility_score};
pub use dependencies::{build_dependency_map, direct_dependencies};
pub use error::{Result, SchemaGraphError};
pub use graph::SchemaGraph;
pub use metrics::{
    analyze_schema, compute_all_metrics, compute_metrics, has_reachable_cycle, MAX_WALK_DEPTH,
};
pub use types::{CompatibilityReport, DependencyMap, SchemaMetrics, TypeMismatch};
