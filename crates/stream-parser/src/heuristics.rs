//! Per-operation annotations shown next to endpoints.
//!
//! All functions here are pure and total: an operation with missing or oddly
//! typed fields simply scores lower.

use crate::types::{Complexity, HttpMethod, ResponseTime};
use serde_json::{Map, Value};

/// Keyword → label table, checked in order; first hit wins
const BUSINESS_CONTEXTS: [(&str, &str); 5] = [
    ("auth", "Authentication"),
    ("user", "User Management"),
    ("payment", "Payments"),
    ("order", "Orders"),
    ("product", "Products"),
];

pub const DEFAULT_BUSINESS_CONTEXT: &str = "General";

/// Bonus added when an operation declares a request body
const REQUEST_BODY_WEIGHT: usize = 2;

/// Parameter count up to which a GET is labelled fast
const FAST_GET_MAX_PARAMETERS: usize = 5;

const MULTIPART: &str = "multipart/form-data";

/// Raw complexity score: parameters + body bonus + response codes + security
pub fn complexity_score(operation: &Map<String, Value>) -> usize {
    let parameters = array_len(operation, "parameters");
    let body = if has_request_body(operation) {
        REQUEST_BODY_WEIGHT
    } else {
        0
    };
    let responses = operation
        .get("responses")
        .and_then(Value::as_object)
        .map_or(0, Map::len);
    let security = array_len(operation, "security");

    parameters + body + responses + security
}

pub fn classify_complexity(operation: &Map<String, Value>) -> Complexity {
    Complexity::from_score(complexity_score(operation))
}

/// Case-insensitive keyword match over tags and summary
pub fn business_context(operation: &Map<String, Value>) -> &'static str {
    let mut haystack = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    if let Some(summary) = operation.get("summary").and_then(Value::as_str) {
        haystack.push(' ');
        haystack.push_str(summary);
    }
    let haystack = haystack.to_lowercase();

    BUSINESS_CONTEXTS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map_or(DEFAULT_BUSINESS_CONTEXT, |(_, label)| label)
}

pub fn estimate_response_time(method: HttpMethod, operation: &Map<String, Value>) -> ResponseTime {
    if method == HttpMethod::Get && array_len(operation, "parameters") <= FAST_GET_MAX_PARAMETERS {
        return ResponseTime::Fast;
    }
    if method == HttpMethod::Patch || accepts_multipart(operation) {
        return ResponseTime::Slow;
    }
    ResponseTime::Medium
}

fn has_request_body(operation: &Map<String, Value>) -> bool {
    operation
        .get("requestBody")
        .is_some_and(|body| !body.is_null())
}

/// OpenAPI 3 `requestBody.content` or Swagger 2 `consumes`
fn accepts_multipart(operation: &Map<String, Value>) -> bool {
    let in_body = operation
        .get("requestBody")
        .and_then(|body| body.get("content"))
        .and_then(Value::as_object)
        .is_some_and(|content| content.keys().any(|media| media.starts_with(MULTIPART)));
    let in_consumes = operation
        .get("consumes")
        .and_then(Value::as_array)
        .is_some_and(|types| types.iter().any(|t| t.as_str() == Some(MULTIPART)));
    in_body || in_consumes
}

fn array_len(operation: &Map<String, Value>, key: &str) -> usize {
    operation
        .get(key)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
