use serde_json::{Map, Value};

/// Pointer prefixes that name an entry of the schema map
pub const SCHEMA_REF_PREFIXES: [&str; 2] = ["#/components/schemas/", "#/definitions/"];

/// Schema name addressed by a `$ref` string, if it points into the schema map
pub fn ref_target(pointer: &str) -> Option<&str> {
    SCHEMA_REF_PREFIXES
        .iter()
        .find_map(|prefix| pointer.strip_prefix(prefix))
        .filter(|name| !name.is_empty() && !name.contains('/'))
}

/// `$ref` pointer string of a schema node, if any
pub fn ref_pointer(schema: &Value) -> Option<&str> {
    schema.get("$ref").and_then(Value::as_str)
}

/// Follow one `$ref` hop; dangling references resolve to the node itself
pub fn resolve<'a>(schema: &'a Value, schemas: &'a Map<String, Value>) -> &'a Value {
    ref_pointer(schema)
        .and_then(ref_target)
        .and_then(|name| schemas.get(name))
        .unwrap_or(schema)
}

/// Child schema nodes: properties, items, compositions, additionalProperties, not
pub fn child_schemas(schema: &Value) -> Vec<&Value> {
    let mut children = Vec::new();
    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        children.extend(properties.values());
    }
    match schema.get("items") {
        Some(Value::Array(tuple)) => children.extend(tuple),
        Some(items @ Value::Object(_)) => children.push(items),
        _ => {}
    }
    for keyword in COMPOSITION_KEYWORDS {
        if let Some(variants) = schema.get(keyword).and_then(Value::as_array) {
            children.extend(variants);
        }
    }
    for keyword in ["additionalProperties", "not"] {
        if let Some(extra @ Value::Object(_)) = schema.get(keyword) {
            children.push(extra);
        }
    }
    children
}

pub const COMPOSITION_KEYWORDS: [&str; 3] = ["allOf", "oneOf", "anyOf"];

/// Declared type of a property: `type` (unions joined by `|`), else its `$ref`
pub fn declared_type(schema: &Value) -> Option<String> {
    match schema.get("type") {
        Some(Value::String(ty)) => Some(ty.clone()),
        Some(Value::Array(types)) => Some(
            types
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("|"),
        ),
        _ => ref_pointer(schema).map(str::to_string),
    }
}
