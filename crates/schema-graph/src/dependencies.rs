use crate::refs::{child_schemas, ref_pointer, ref_target};
use crate::types::DependencyMap;
use serde_json::{Map, Value};

/// Direct references of every schema in the map.
///
/// References are collected from the schema's own tree without following
/// them. Only names present in `schemas` count; the schema's own name is
/// never listed.
pub fn build_dependency_map(schemas: &Map<String, Value>) -> DependencyMap {
    schemas
        .iter()
        .map(|(name, schema)| (name.clone(), direct_dependencies(name, schema, schemas)))
        .collect()
}

pub fn direct_dependencies(
    name: &str,
    schema: &Value,
    schemas: &Map<String, Value>,
) -> Vec<String> {
    let mut found = Vec::new();
    collect_refs(schema, &mut |target| {
        if target != name && schemas.contains_key(target) && !found.iter().any(|f| f == target) {
            found.push(target.to_string());
        }
    });
    found
}

fn collect_refs<'a>(schema: &'a Value, visit: &mut impl FnMut(&'a str)) {
    if let Some(target) = ref_pointer(schema).and_then(ref_target) {
        visit(target);
    }
    for child in child_schemas(schema) {
        collect_refs(child, visit);
    }
}
