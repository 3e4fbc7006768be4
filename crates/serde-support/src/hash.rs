//! Hashing for preserved raw JSON payloads.
//!
//! `serde_json::Value` does not implement `Hash`. Payloads that are kept
//! verbatim (unknown extension values) still take part in structural
//! hashing, so they are hashed here in a canonical form: object members in
//! sorted key order, numbers by their textual form. Both choices agree with
//! `Value`'s own equality, which ignores member order.

use std::hash::{Hash, Hasher};

use serde_json::Value;

pub fn hash_json<H: Hasher>(value: &Value, state: &mut H) {
    match value {
        Value::Null => 0u8.hash(state),
        Value::Bool(b) => {
            1u8.hash(state);
            b.hash(state);
        }
        Value::Number(n) => {
            2u8.hash(state);
            n.to_string().hash(state);
        }
        Value::String(s) => {
            3u8.hash(state);
            s.hash(state);
        }
        Value::Array(items) => {
            4u8.hash(state);
            items.len().hash(state);
            for item in items {
                hash_json(item, state);
            }
        }
        Value::Object(map) => {
            5u8.hash(state);
            map.len().hash(state);
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (key, item) in entries {
                key.hash(state);
                hash_json(item, state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::hash_map::DefaultHasher;

    fn digest(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        hash_json(value, &mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_member_order_does_not_matter() {
        let a: Value = serde_json::from_str(r#"{"a": 1, "b": [true, null]}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"b": [true, null], "a": 1}"#).unwrap();
        assert_eq!(a, b);
        assert_eq!(digest(&a), digest(&b));
    }

    #[test]
    fn test_distinct_shapes_differ() {
        assert_ne!(digest(&json!("1")), digest(&json!(1)));
        assert_ne!(digest(&json!([])), digest(&json!({})));
    }
}
