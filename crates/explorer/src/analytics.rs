use crate::session::LoadedSpec;
use serde::Serialize;
use std::collections::BTreeMap;

/// Length of the ranked schema lists
pub const TOP_SCHEMAS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiAnalytics {
    pub title: Option<String>,
    pub version: Option<String>,
    pub openapi_version: Option<String>,
    pub endpoints: EndpointAnalytics,
    pub schemas: SchemaAnalytics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointAnalytics {
    pub total: usize,
    pub by_method: BTreeMap<String, usize>,
    pub by_complexity: BTreeMap<String, usize>,
    pub by_business_context: BTreeMap<String, usize>,
    pub by_response_time: BTreeMap<String, usize>,
    pub deprecated: usize,
    pub tag_usage: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaAnalytics {
    pub total: usize,
    pub average_complexity: f64,
    pub max_complexity: usize,
    pub circular: Vec<String>,
    /// Groups of schemas that reference each other, directly or indirectly
    pub cycle_groups: Vec<Vec<String>>,
    pub most_complex: Vec<RankedSchema>,
    pub most_referenced: Vec<RankedSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSchema {
    pub name: String,
    pub value: usize,
}

pub fn compute_analytics(loaded: &LoadedSpec) -> ApiAnalytics {
    let spec = loaded.spec();
    ApiAnalytics {
        title: spec.title().map(str::to_string),
        version: spec.api_version().map(str::to_string),
        openapi_version: spec.openapi_version.clone(),
        endpoints: endpoint_analytics(loaded),
        schemas: schema_analytics(loaded),
    }
}

fn endpoint_analytics(loaded: &LoadedSpec) -> EndpointAnalytics {
    let mut stats = EndpointAnalytics::default();
    for endpoint in loaded.endpoints() {
        stats.total += 1;
        bump(&mut stats.by_method, endpoint.method.as_str());
        bump(&mut stats.by_complexity, endpoint.complexity.as_str());
        bump(&mut stats.by_business_context, &endpoint.business_context);
        bump(
            &mut stats.by_response_time,
            endpoint.estimated_response_time.as_str(),
        );
        if endpoint.deprecated {
            stats.deprecated += 1;
        }
        for tag in &endpoint.tags {
            bump(&mut stats.tag_usage, tag);
        }
    }
    stats
}

fn schema_analytics(loaded: &LoadedSpec) -> SchemaAnalytics {
    let analysis = loaded.analysis();
    let metrics = analysis.all_metrics();
    SchemaAnalytics {
        total: metrics.len(),
        average_complexity: (analysis.average_complexity() * 100.0).round() / 100.0,
        max_complexity: metrics.values().map(|m| m.complexity).max().unwrap_or(0),
        circular: analysis
            .circular_schemas()
            .into_iter()
            .map(str::to_string)
            .collect(),
        cycle_groups: analysis.graph().cycles(),
        most_complex: analysis
            .most_complex(TOP_SCHEMAS)
            .into_iter()
            .map(|(name, m)| RankedSchema {
                name: name.to_string(),
                value: m.complexity,
            })
            .collect(),
        most_referenced: analysis
            .graph()
            .most_referenced(TOP_SCHEMAS)
            .into_iter()
            .map(|(name, value)| RankedSchema { name, value })
            .collect(),
    }
}

fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    *counts.entry(key.to_string()).or_default() += 1;
}
