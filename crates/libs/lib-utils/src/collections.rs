//! # Collection Utilities

use serde_json::{Map, Value};
use std::collections::HashSet;
use std::hash::Hash;

/// Remove duplicates, keeping the first occurrence of each element in order.
pub fn unique_array<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .filter(|item| seen.insert(*item))
        .cloned()
        .collect()
}

/// Shallow merge of two JSON objects; keys in `overrides` win.
///
/// A non-object on either side is treated as an empty object.
pub fn merge_objects(base: &Value, overrides: &Value) -> Value {
    let mut merged: Map<String, Value> = base.as_object().cloned().unwrap_or_default();
    if let Some(extra) = overrides.as_object() {
        for (key, value) in extra {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unique_array_preserves_order() {
        assert_eq!(unique_array(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert_eq!(unique_array(&["a", "b", "a"]), vec!["a", "b"]);
        assert!(unique_array::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_merge_objects_is_shallow() {
        let base = json!({"page": 1, "filter": {"category": "books"}});
        let over = json!({"page": 2, "filter": {"status": "active"}});
        assert_eq!(
            merge_objects(&base, &over),
            json!({"page": 2, "filter": {"status": "active"}})
        );
    }

    #[test]
    fn test_merge_objects_non_objects() {
        assert_eq!(merge_objects(&json!(null), &json!({"a": 1})), json!({"a": 1}));
        assert_eq!(merge_objects(&json!({"a": 1}), &json!([1, 2])), json!({"a": 1}));
    }
}
