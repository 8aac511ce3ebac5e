use crate::heuristics;
use crate::types::{AssembledSpecification, EndpointRecord, HttpMethod, ParsedSection, SectionKind};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Merges emitted sections into one specification and derives endpoints.
///
/// Same-kind sections are shallow-merged: top-level keys of a later object
/// overwrite earlier ones, nested values are replaced whole, and list-valued
/// sections replace the accumulated list.
#[derive(Debug, Clone, Copy)]
pub struct DocumentAssembler {
    prioritize_endpoints: bool,
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DocumentAssembler {
    pub fn new(prioritize_endpoints: bool) -> Self {
        Self {
            prioritize_endpoints,
        }
    }

    pub fn assemble(
        &self,
        mut sections: Vec<ParsedSection>,
    ) -> (AssembledSpecification, Vec<EndpointRecord>) {
        if self.prioritize_endpoints {
            // stable: same-kind sections keep arrival order
            sections.sort_by_key(|s| (s.kind.priority(), s.sequence));
        } else {
            sections.sort_by_key(|s| s.sequence);
        }

        let mut spec = AssembledSpecification::default();
        for section in sections {
            merge_section(&mut spec, section);
        }

        let endpoints = extract_endpoints(&spec.paths);
        log::debug!(
            "assembled {} paths into {} endpoints",
            spec.paths.len(),
            endpoints.len()
        );
        (spec, endpoints)
    }
}

fn merge_section(spec: &mut AssembledSpecification, section: ParsedSection) {
    let kind = section.kind;
    match (kind, section.payload) {
        (SectionKind::Info, Value::Object(map)) => shallow_merge(&mut spec.info, map),
        (SectionKind::Paths, Value::Object(map)) => shallow_merge(&mut spec.paths, map),
        (SectionKind::Components, Value::Object(map)) => {
            shallow_merge(&mut spec.components, map)
        }
        (SectionKind::Definitions, Value::Object(map)) => {
            let schemas = spec
                .components
                .entry("schemas")
                .or_insert_with(|| Value::Object(Map::new()));
            if !schemas.is_object() {
                *schemas = Value::Object(Map::new());
            }
            if let Value::Object(target) = schemas {
                shallow_merge(target, map);
            }
        }
        (SectionKind::Servers, Value::Array(list)) => spec.servers = list,
        (SectionKind::Security, Value::Array(list)) => spec.security = list,
        (SectionKind::Tags, Value::Array(list)) => spec.tags = list,
        (_, other) => {
            log::warn!(
                "ignoring '{}' section with unexpected {} payload",
                kind.as_str(),
                json_type_name(&other)
            );
        }
    }
}

/// Overwrite-by-key, no recursion
fn shallow_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, value) in source {
        target.insert(key, value);
    }
}

/// One record per recognised method under each path, in document order
pub fn extract_endpoints(paths: &Map<String, Value>) -> Vec<EndpointRecord> {
    let mut endpoints = Vec::new();
    for (path, item) in paths {
        let Some(item) = item.as_object() else {
            continue;
        };
        for method in HttpMethod::ALL {
            if let Some(Value::Object(operation)) = item.get(method.as_key()) {
                endpoints.push(build_record(method, path, operation));
            }
        }
    }
    endpoints
}

fn build_record(method: HttpMethod, path: &str, operation: &Map<String, Value>) -> EndpointRecord {
    let text = |key: &str| {
        operation
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let tags: BTreeSet<String> = operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    EndpointRecord {
        method,
        path: path.to_string(),
        summary: text("summary"),
        description: text("description"),
        tags,
        operation_id: operation
            .get("operationId")
            .and_then(Value::as_str)
            .map(str::to_string),
        parameters: operation
            .get("parameters")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        request_body: operation.get("requestBody").filter(|v| !v.is_null()).cloned(),
        responses: operation
            .get("responses")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default(),
        security: operation.get("security").and_then(Value::as_array).cloned(),
        deprecated: operation
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        complexity: heuristics::classify_complexity(operation),
        business_context: heuristics::business_context(operation).to_string(),
        estimated_response_time: heuristics::estimate_response_time(method, operation),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Complexity, ResponseTime};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn section(kind: SectionKind, payload: Value, sequence: usize) -> ParsedSection {
        ParsedSection::new(kind, payload, 0, sequence)
    }

    #[test]
    fn later_sections_overwrite_top_level_keys_only() {
        let sections = vec![
            section(SectionKind::Info, json!({"title": "A", "contact": {"name": "x"}}), 0),
            section(SectionKind::Info, json!({"title": "B", "contact": {"email": "y"}}), 1),
        ];
        let (spec, _) = DocumentAssembler::default().assemble(sections);
        assert_eq!(spec.title(), Some("B"));
        assert_eq!(spec.info["contact"], json!({"email": "y"}));
    }

    #[test]
    fn list_sections_replace_previous_value() {
        let sections = vec![
            section(SectionKind::Tags, json!([{"name": "a"}, {"name": "b"}]), 0),
            section(SectionKind::Tags, json!([{"name": "c"}]), 1),
        ];
        let (spec, _) = DocumentAssembler::default().assemble(sections);
        assert_eq!(spec.tags, vec![json!({"name": "c"})]);
    }

    #[test]
    fn definitions_land_in_component_schemas() {
        let sections = vec![
            section(SectionKind::Components, json!({"schemas": {"A": {"type": "string"}}}), 0),
            section(SectionKind::Definitions, json!({"B": {"type": "object"}}), 1),
        ];
        let (spec, _) = DocumentAssembler::default().assemble(sections);
        assert_eq!(spec.schema_count(), 2);
        assert_eq!(spec.schemas().unwrap()["B"], json!({"type": "object"}));
    }

    #[test]
    fn mismatched_payload_types_are_ignored() {
        let sections = vec![
            section(SectionKind::Info, json!(["not", "an", "object"]), 0),
            section(SectionKind::Servers, json!({"url": "x"}), 1),
        ];
        let (spec, endpoints) = DocumentAssembler::default().assemble(sections);
        assert!(spec.info.is_empty());
        assert!(spec.servers.is_empty());
        assert!(endpoints.is_empty());
    }

    #[test]
    fn priority_order_ignores_arrival_when_enabled() {
        // duplicates of one kind always merge in arrival order
        let sections = vec![
            section(SectionKind::Paths, json!({"/a": {"get": {"summary": "old"}}}), 2),
            section(SectionKind::Tags, json!([]), 0),
            section(SectionKind::Paths, json!({"/a": {"get": {"summary": "new"}}}), 3),
        ];
        let (_, endpoints) = DocumentAssembler::new(true).assemble(sections.clone());
        assert_eq!(endpoints[0].summary, "new");

        let (_, endpoints) = DocumentAssembler::new(false).assemble(sections);
        assert_eq!(endpoints[0].summary, "new");
    }

    #[test]
    fn endpoints_are_extracted_with_defaults() {
        let paths = json!({
            "/pets": {
                "parameters": [{"name": "shared"}],
                "get": {"summary": "List", "tags": ["pets", "pets"], "responses": {"200": {}}},
                "post": {
                    "operationId": "createPet",
                    "requestBody": {"content": {"application/json": {}}},
                    "deprecated": true
                },
                "x-note": {"get": "ignored"}
            },
            "/bad": "not an item"
        });
        let endpoints = extract_endpoints(paths.as_object().unwrap());
        assert_eq!(endpoints.len(), 2);

        let get = &endpoints[0];
        assert_eq!(get.key(), "GET /pets");
        assert_eq!(get.tags.len(), 1);
        assert_eq!(get.description, "");
        assert_eq!(get.complexity, Complexity::Low);
        assert_eq!(get.estimated_response_time, ResponseTime::Fast);

        let post = &endpoints[1];
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.operation_id.as_deref(), Some("createPet"));
        assert!(post.request_body.is_some());
        assert!(post.deprecated);
        assert!(post.parameters.is_empty());
        assert_eq!(post.summary, "");
    }

    #[test]
    fn methods_follow_fixed_order_within_a_path() {
        let paths = json!({"/x": {"trace": {}, "delete": {}, "get": {}, "patch": {}}});
        let methods: Vec<HttpMethod> = extract_endpoints(paths.as_object().unwrap())
            .into_iter()
            .map(|e| e.method)
            .collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Delete, HttpMethod::Patch, HttpMethod::Trace]
        );
    }
}
