use crate::refs::declared_type;
use crate::types::{CompatibilityReport, TypeMismatch};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

const NAME_WEIGHT: f64 = 0.6;
const TYPE_WEIGHT: f64 = 0.4;

/// 0–100 compatibility of two schemas; symmetric, and 100 for identical input
pub fn compatibility_score(left: &Value, right: &Value) -> u8 {
    compare_schemas(left, right).score
}

/// Compare the top-level properties of two (already resolved) schemas
pub fn compare_schemas(left: &Value, right: &Value) -> CompatibilityReport {
    let empty = Map::new();
    let left_props = properties(left).unwrap_or(&empty);
    let right_props = properties(right).unwrap_or(&empty);

    let left_names: BTreeSet<&str> = left_props.keys().map(String::as_str).collect();
    let right_names: BTreeSet<&str> = right_props.keys().map(String::as_str).collect();

    let shared: Vec<&str> = left_names.intersection(&right_names).copied().collect();
    let union = left_names.union(&right_names).count();

    let type_mismatches: Vec<TypeMismatch> = shared
        .iter()
        .filter_map(|name| {
            let left = declared_type(&left_props[*name]);
            let right = declared_type(&right_props[*name]);
            (left != right).then(|| TypeMismatch {
                property: (*name).to_string(),
                left,
                right,
            })
        })
        .collect();

    let jaccard = if union == 0 {
        1.0
    } else {
        shared.len() as f64 / union as f64
    };
    let type_agreement = if shared.is_empty() {
        if union == 0 {
            1.0
        } else {
            0.0
        }
    } else {
        (shared.len() - type_mismatches.len()) as f64 / shared.len() as f64
    };
    let score = ((jaccard * NAME_WEIGHT + type_agreement * TYPE_WEIGHT) * 100.0)
        .round()
        .clamp(0.0, 100.0) as u8;

    CompatibilityReport {
        score,
        shared: shared.iter().map(|s| s.to_string()).collect(),
        left_only: left_names
            .difference(&right_names)
            .map(|s| s.to_string())
            .collect(),
        right_only: right_names
            .difference(&left_names)
            .map(|s| s.to_string())
            .collect(),
        type_mismatches,
    }
}

fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties").and_then(Value::as_object)
}
