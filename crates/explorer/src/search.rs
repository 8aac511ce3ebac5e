use apiscope_stream_parser::{Complexity, EndpointRecord, HttpMethod, ResponseTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// Endpoint filter; every set field must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointQuery {
    /// Case-insensitive substring over path, summary, description,
    /// operationId and tags
    pub query: Option<String>,
    pub method: Option<HttpMethod>,
    pub tag: Option<String>,
    pub complexity: Option<Complexity>,
    pub deprecated: Option<bool>,
    pub limit: Option<usize>,
}

/// Compact listing view of an endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    pub tags: BTreeSet<String>,
    pub complexity: Complexity,
    pub business_context: String,
    pub estimated_response_time: ResponseTime,
    pub deprecated: bool,
}

impl From<&EndpointRecord> for EndpointSummary {
    fn from(record: &EndpointRecord) -> Self {
        Self {
            method: record.method,
            path: record.path.clone(),
            summary: record.summary.clone(),
            operation_id: record.operation_id.clone(),
            tags: record.tags.clone(),
            complexity: record.complexity,
            business_context: record.business_context.clone(),
            estimated_response_time: record.estimated_response_time,
            deprecated: record.deprecated,
        }
    }
}

/// Search result page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    /// Matches before the limit was applied
    pub total_matches: usize,
    pub endpoints: Vec<EndpointSummary>,
}

impl EndpointQuery {
    pub fn matches(&self, endpoint: &EndpointRecord) -> bool {
        if self.method.is_some_and(|m| m != endpoint.method) {
            return false;
        }
        if self.complexity.is_some_and(|c| c != endpoint.complexity) {
            return false;
        }
        if self.deprecated.is_some_and(|d| d != endpoint.deprecated) {
            return false;
        }
        if let Some(tag) = &self.tag {
            if !endpoint.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                return false;
            }
        }
        match self.query.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => text_matches(endpoint, &query.to_lowercase()),
            _ => true,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT)
    }
}

fn text_matches(endpoint: &EndpointRecord, needle: &str) -> bool {
    let contains = |haystack: &str| haystack.to_lowercase().contains(needle);
    contains(&endpoint.path)
        || contains(&endpoint.summary)
        || contains(&endpoint.description)
        || endpoint.operation_id.as_deref().is_some_and(contains)
        || endpoint.tags.iter().any(|tag| contains(tag))
}

/// Matching endpoints in document order, truncated to the query limit
pub fn search_endpoints(endpoints: &[EndpointRecord], query: &EndpointQuery) -> SearchResults {
    let matched: Vec<&EndpointRecord> = endpoints.iter().filter(|e| query.matches(e)).collect();
    let total_matches = matched.len();
    SearchResults {
        total_matches,
        endpoints: matched
            .into_iter()
            .take(query.limit())
            .map(EndpointSummary::from)
            .collect(),
    }
}
