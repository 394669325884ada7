//! Structural superset matching over JSON values
//!
//! Shared by the tree-shape and manifest-shape checks.

use serde_json::Value;

/// Check that `actual` satisfies every key/element declared in `required`.
///
/// - Objects: each required key must exist in `actual` with a matching value.
/// - Arrays: `actual` must be at least as long; elements match by position.
/// - Scalars: equality.
///
/// Extra keys and trailing elements in `actual` are ignored.
pub fn is_superset(actual: &Value, required: &Value) -> bool {
    match (actual, required) {
        (Value::Object(actual), Value::Object(required)) => {
            required.iter().all(|(key, required_value)| {
                actual
                    .get(key)
                    .is_some_and(|actual_value| is_superset(actual_value, required_value))
            })
        }
        (Value::Array(actual), Value::Array(required)) => {
            actual.len() >= required.len()
                && actual
                    .iter()
                    .zip(required)
                    .all(|(actual, required)| is_superset(actual, required))
        }
        // Mismatched kinds are never equal
        (actual, required) => actual == required,
    }
}
