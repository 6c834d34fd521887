//! Size and uniqueness predicates.

use std::collections::HashSet;

use serde_json::Value;

/// Element count of an array or object, or character count of a string.
#[must_use]
pub fn size(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        Value::Object(map) => Some(map.len()),
        Value::String(s) => Some(s.chars().count()),
        _ => None,
    }
}

/// An array whose elements are pairwise distinct.
///
/// Elements compare by their serialized JSON text.
#[must_use]
pub fn has_unique_items(value: &Value) -> bool {
    let Some(items) = value.as_array() else {
        return false;
    };
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().all(|item| seen.insert(item.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sizes() {
        assert_eq!(size(&json!([1, 2, 3])), Some(3));
        assert_eq!(size(&json!({"a": 1})), Some(1));
        assert_eq!(size(&json!("héllo")), Some(5));
        assert_eq!(size(&json!(5)), None);
    }

    #[test]
    fn uniqueness() {
        assert!(has_unique_items(&json!([1, "1", [1]])));
        assert!(!has_unique_items(&json!([{"a": 1}, {"a": 1}])));
        assert!(has_unique_items(&json!([])));
        assert!(!has_unique_items(&json!("abc")));
    }
}
