//! Recursive structural merge for environment trees.
//!
//! Objects present on both sides are merged key by key. Every other update
//! value (scalars, arrays, new keys, type mismatches) replaces the base value
//! wholesale. Keys missing from the update are never touched.

use serde_json::{Map, Value};

/// Applies `updates` onto `base` in place.
pub fn apply_updates(base: &mut Map<String, Value>, updates: &Map<String, Value>) {
    for (key, update) in updates {
        match (base.get_mut(key), update) {
            (Some(Value::Object(base_obj)), Value::Object(update_obj)) => {
                apply_updates(base_obj, update_obj);
            }
            _ => {
                base.insert(key.clone(), update.clone());
            }
        }
    }
}

/// Returns a new tree with `updates` merged onto a copy of `base`.
pub fn merge(base: &Map<String, Value>, updates: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    apply_updates(&mut merged, updates);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_empty_update_is_identity() {
        let base = obj(json!({"a": 1, "b": {"c": [1, 2]}}));
        assert_eq!(merge(&base, &Map::new()), base);
    }

    #[test]
    fn test_untouched_keys_survive() {
        let base = obj(json!({"namespaces": ["default"], "current_branch": null, "x": 1}));
        let updates = obj(json!({"x": 2}));

        let merged = merge(&base, &updates);

        assert_eq!(merged["namespaces"], json!(["default"]));
        assert_eq!(merged["current_branch"], Value::Null);
        assert_eq!(merged["x"], json!(2));
    }

    #[test]
    fn test_nested_objects_union_keys_update_wins() {
        let base = obj(json!({
            "pods": {"default": {"nginx-pod": {"status": "Running", "ip": "10.0.0.2"}}}
        }));
        let updates = obj(json!({
            "pods": {"default": {
                "nginx-pod": {"status": "Terminating"},
                "redis-pod": {"status": "Pending"}
            }}
        }));

        let merged = merge(&base, &updates);

        assert_eq!(
            Value::Object(merged),
            json!({"pods": {"default": {
                "nginx-pod": {"status": "Terminating", "ip": "10.0.0.2"},
                "redis-pod": {"status": "Pending"}
            }}})
        );
    }

    #[test]
    fn test_arrays_are_replaced_not_concatenated() {
        let base = obj(json!({"branches": ["main", "dev"]}));
        let updates = obj(json!({"branches": ["feature"]}));

        assert_eq!(merge(&base, &updates)["branches"], json!(["feature"]));
    }

    #[test]
    fn test_type_mismatch_replaces() {
        let base = obj(json!({"a": "scalar", "b": {"nested": true}}));
        let updates = obj(json!({"a": {"now": "object"}, "b": 7}));

        let merged = merge(&base, &updates);

        assert_eq!(merged["a"], json!({"now": "object"}));
        assert_eq!(merged["b"], json!(7));
    }

    #[test]
    fn test_null_update_overwrites_instead_of_deleting() {
        let base = obj(json!({"current_branch": "main"}));
        let updates = obj(json!({"current_branch": null}));

        let merged = merge(&base, &updates);

        assert!(merged.contains_key("current_branch"));
        assert_eq!(merged["current_branch"], Value::Null);
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let a = obj(json!({"k": 1}));
        let b = obj(json!({"k": 2}));

        assert_ne!(merge(&a, &b), merge(&b, &a));
    }

    #[test]
    fn test_repeated_application_is_idempotent() {
        let base = obj(json!({"pods": {"default": {}}, "initialized": false}));
        let updates = obj(json!({"pods": {"default": {"web": {"status": "Running"}}}, "initialized": true}));

        let once = merge(&base, &updates);
        let twice = merge(&once, &updates);

        assert_eq!(once, twice);
    }
}
