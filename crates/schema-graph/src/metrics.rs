use crate::dependencies::build_dependency_map;
use crate::error::{Result, SchemaGraphError};
use crate::refs::{ref_pointer, ref_target, resolve, COMPOSITION_KEYWORDS};
use crate::types::{DependencyMap, SchemaMetrics};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Deepest nesting level the complexity walk descends to
pub const MAX_WALK_DEPTH: usize = 10;

/// Added once per nested object or array level
const NESTING_WEIGHT: usize = 2;

/// Added once per node carrying any of `allOf`/`oneOf`/`anyOf`
const POLYMORPHISM_WEIGHT: usize = 5;

/// Metrics for one named schema.
///
/// The complexity walk follows `$ref` into target schemas, bounded by
/// [`MAX_WALK_DEPTH`] and by never re-entering a reference already being
/// expanded on the current branch.
pub fn compute_metrics(
    name: &str,
    schema: &Value,
    schemas: &Map<String, Value>,
    dependencies: &DependencyMap,
) -> SchemaMetrics {
    let mut walk = ComplexityWalk {
        schemas,
        expanding: vec![name],
        complexity: 0,
        depth: 0,
        properties: 0,
    };
    let root = resolve(schema, schemas);
    walk.visit(root, 0);

    let required_count = root
        .get("required")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    SchemaMetrics {
        complexity: walk.complexity,
        depth: walk.depth,
        property_count: walk.properties,
        required_count,
        dependency_count: dependencies.get(name).map_or(0, Vec::len),
        circular_refs: has_reachable_cycle(name, dependencies),
    }
}

/// Metrics for every schema of the map, sharing one dependency map
pub fn compute_all_metrics(schemas: &Map<String, Value>) -> BTreeMap<String, SchemaMetrics> {
    let dependencies = build_dependency_map(schemas);
    schemas
        .iter()
        .map(|(name, schema)| {
            (
                name.clone(),
                compute_metrics(name, schema, schemas, &dependencies),
            )
        })
        .collect()
}

/// Metrics for a schema looked up by name
pub fn analyze_schema(
    name: &str,
    schemas: &Map<String, Value>,
    dependencies: &DependencyMap,
) -> Result<SchemaMetrics> {
    let schema = schemas
        .get(name)
        .ok_or_else(|| SchemaGraphError::SchemaNotFound(name.to_string()))?;
    Ok(compute_metrics(name, schema, schemas, dependencies))
}

struct ComplexityWalk<'a> {
    schemas: &'a Map<String, Value>,
    /// Schema names being expanded on the current branch
    expanding: Vec<&'a str>,
    complexity: usize,
    depth: usize,
    properties: usize,
}

impl<'a> ComplexityWalk<'a> {
    fn visit(&mut self, node: &'a Value, level: usize) {
        if level > MAX_WALK_DEPTH {
            return;
        }
        self.depth = self.depth.max(level);

        if let Some(properties) = node.get("properties").and_then(Value::as_object) {
            if level > 0 {
                self.complexity += NESTING_WEIGHT;
            }
            for property in properties.values() {
                self.properties += 1;
                self.complexity += 1;
                self.descend(property, level + 1);
            }
        }

        match node.get("items") {
            Some(items @ Value::Object(_)) => {
                self.complexity += NESTING_WEIGHT;
                self.descend(items, level + 1);
            }
            Some(Value::Array(tuple)) => {
                self.complexity += NESTING_WEIGHT;
                for item in tuple {
                    self.descend(item, level + 1);
                }
            }
            _ => {}
        }

        let mut polymorphic = false;
        for keyword in COMPOSITION_KEYWORDS {
            if let Some(variants) = node.get(keyword).and_then(Value::as_array) {
                polymorphic = true;
                for variant in variants {
                    self.descend(variant, level + 1);
                }
            }
        }
        // one bonus per node, however many keywords it combines
        if polymorphic {
            self.complexity += POLYMORPHISM_WEIGHT;
        }

        if let Some(extra @ Value::Object(_)) = node.get("additionalProperties") {
            self.descend(extra, level + 1);
        }
    }

    /// Visit a child, expanding a resolvable `$ref` unless it is already
    /// being expanded higher up this branch
    fn descend(&mut self, node: &'a Value, level: usize) {
        let schemas = self.schemas;
        let target = ref_pointer(node)
            .and_then(ref_target)
            .and_then(|name| schemas.get(name).map(|schema| (name, schema)));

        match target {
            Some((name, _)) if self.expanding.contains(&name) => {}
            Some((name, resolved)) => {
                self.expanding.push(name);
                self.visit(resolved, level);
                self.expanding.pop();
            }
            None => self.visit(node, level),
        }
    }
}

/// True when a depth-first walk from `start` meets a name already on its
/// current path.
///
/// Iterative with a finished set, so each name is expanded at most once:
/// linear in the size of the map and free of recursion limits.
pub fn has_reachable_cycle(start: &str, dependencies: &DependencyMap) -> bool {
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut finished: HashSet<&str> = HashSet::new();
    let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
    on_path.insert(start);

    while let Some(&(node, next)) = stack.last() {
        let children = dependencies.get(node).map_or(&[][..], Vec::as_slice);
        match children.get(next) {
            Some(child) => {
                let top = stack.len() - 1;
                stack[top].1 += 1;
                let child = child.as_str();
                if on_path.contains(child) {
                    return true;
                }
                if !finished.contains(child) {
                    on_path.insert(child);
                    stack.push((child, 0));
                }
            }
            None => {
                stack.pop();
                on_path.remove(node);
                finished.insert(node);
            }
        }
    }
    false
}
