//! Predicates that compare a field with a sibling.

use serde_json::Value;

use crate::predicates::{loose_eq, sibling};

/// The field equals the sibling `other` of the enclosing object.
#[must_use]
pub fn equals_field(value: &Value, parent: &Value, other: &str) -> bool {
    loose_eq(value, sibling(parent, other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compares_with_sibling() {
        let form = json!({"password": "s3cret", "confirm": "s3cret", "count": 2});
        assert!(equals_field(&json!("s3cret"), &form, "password"));
        assert!(!equals_field(&json!("other"), &form, "password"));
        assert!(equals_field(&json!(2.0), &form, "count"));
    }

    #[test]
    fn missing_sibling_reads_as_null() {
        assert!(!equals_field(&json!("x"), &json!({}), "password"));
    }
}
