//! Recursive key search over captured JSON

use serde_json::Value;

/// Find the first value stored under `key`, at any depth
///
/// Objects are checked for the key before any of their children are
/// searched. Arrays are searched element by element. A `null` stored under a
/// matching key ends the search of that object, and the search continues
/// with the object's siblings.
pub fn find_nested<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    match data {
        Value::Object(map) => {
            if let Some(value) = map.get(key) {
                return (!value.is_null()).then_some(value);
            }
            map.values().find_map(|child| find_nested(child, key))
        }
        Value::Array(items) => items.iter().find_map(|item| find_nested(item, key)),
        _ => None,
    }
}

/// Whether a resolved value is worth injecting
///
/// Null, `false`, zero, and empty strings, arrays and objects count as
/// absent.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_finds_key_at_any_depth() {
        let data = json!({
            "data": {"items": [{"meta": {}}, {"user": {"userId": 42}}]}
        });
        assert_eq!(find_nested(&data, "userId"), Some(&json!(42)));
        assert_eq!(find_nested(&data, "missing"), None);
    }

    #[test]
    fn test_shallow_match_wins_over_deeper_sibling() {
        let data = json!({"nested": {"token": "deep"}, "token": "top"});
        assert_eq!(find_nested(&data, "token"), Some(&json!("top")));
    }

    #[test]
    fn test_first_duplicate_in_document_order() {
        let data = json!([{"a": {"id": 1}}, {"id": 2}]);
        assert_eq!(find_nested(&data, "id"), Some(&json!(1)));
    }

    #[test]
    fn test_null_match_falls_through_to_siblings() {
        let data = json!({"first": {"id": null}, "second": {"id": "x"}});
        assert_eq!(find_nested(&data, "id"), Some(&json!("x")));

        let top_null = json!({"id": null, "child": {"id": "x"}});
        assert_eq!(find_nested(&top_null, "id"), None);
    }

    #[test]
    fn test_scalars_have_no_keys() {
        assert_eq!(find_nested(&json!("token"), "token"), None);
    }

    #[test]
    fn test_presence_follows_truthiness() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("")));
        assert!(!is_present(&json!(0)));
        assert!(!is_present(&json!(false)));
        assert!(!is_present(&json!([])));
        assert!(is_present(&json!("abc")));
        assert!(is_present(&json!(7)));
        assert!(is_present(&json!({"k": 1})));
    }
}
