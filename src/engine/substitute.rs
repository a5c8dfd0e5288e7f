//! Placeholder substitution in request templates
//!
//! A field is a placeholder for `name` when its current value is exactly
//! `name` or `eq.<name>`. Only the first matching field of a channel is
//! replaced. When the matched field carried `eq.`, the new value is written
//! back as `eq.<value>`.

use indexmap::IndexMap;
use serde_json::Value;

use crate::project::{Channel, RequestTemplate};

/// Prefix marking a Postgrest-style equality filter
pub const EQ_MARKER: &str = "eq.";

/// Split a parameter name into its bare form and whether it carried `eq.`
pub fn strip_marker(name: &str) -> (&str, bool) {
    match name.strip_prefix(EQ_MARKER) {
        Some(bare) => (bare, true),
        None => (name, false),
    }
}

/// `Some(marked)` when `current` is a placeholder for `name`
fn placeholder_match(current: &str, name: &str) -> Option<bool> {
    if current == name {
        Some(false)
    } else if current.strip_prefix(EQ_MARKER) == Some(name) {
        Some(true)
    } else {
        None
    }
}

/// Text form of a JSON value for headers and query params
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace the first placeholder for `name` in a string map
///
/// Returns the key that was written.
pub fn substitute_text(
    fields: &mut IndexMap<String, String>,
    name: &str,
    value: &Value,
    force_marker: bool,
) -> Option<String> {
    for (key, current) in fields.iter_mut() {
        if let Some(marked) = placeholder_match(current.as_str(), name) {
            let text = value_text(value);
            *current = if marked || force_marker {
                format!("{}{}", EQ_MARKER, text)
            } else {
                text
            };
            return Some(key.clone());
        }
    }
    None
}

/// Replace the first placeholder for `name` in a JSON map
///
/// Unmarked substitutions keep the value's JSON type.
pub fn substitute_json(
    fields: &mut IndexMap<String, Value>,
    name: &str,
    value: &Value,
    force_marker: bool,
) -> Option<String> {
    for (key, current) in fields.iter_mut() {
        let Some(marked) = current.as_str().and_then(|s| placeholder_match(s, name)) else {
            continue;
        };
        *current = if marked || force_marker {
            Value::String(format!("{}{}", EQ_MARKER, value_text(value)))
        } else {
            value.clone()
        };
        return Some(key.clone());
    }
    None
}

/// Replace the first placeholder for `name` in one channel of a template
///
/// `EnvSelf` targets environment variables, never the template, so it
/// always returns `None` here.
pub fn substitute(
    template: &mut RequestTemplate,
    channel: Channel,
    name: &str,
    value: &Value,
    force_marker: bool,
) -> Option<String> {
    match channel {
        Channel::Header => substitute_text(&mut template.headers, name, value, force_marker),
        Channel::Param => substitute_text(&mut template.params, name, value, force_marker),
        Channel::Body => substitute_json(&mut template.body, name, value, force_marker),
        Channel::EnvSelf => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template() -> RequestTemplate {
        serde_json::from_value(json!({
            "url": "http://x",
            "method": "GET",
            "path": "/users",
            "headers": {"Authorization": "token", "X-Trace": "token"},
            "params": {"id": "eq.userId", "limit": "10"},
            "body": {"owner": "userId", "count": 1}
        }))
        .unwrap()
    }

    #[test]
    fn test_strip_marker() {
        assert_eq!(strip_marker("eq.id"), ("id", true));
        assert_eq!(strip_marker("id"), ("id", false));
        assert_eq!(strip_marker("req.id"), ("req.id", false));
    }

    #[test]
    fn test_marker_follows_matched_field() {
        let mut request = template();
        substitute(&mut request, Channel::Param, "userId", &json!("42"), false);
        substitute(&mut request, Channel::Body, "userId", &json!("42"), false);
        assert_eq!(request.params["id"], "eq.42");
        assert_eq!(request.body["owner"], json!("42"));
    }

    #[test]
    fn test_forced_marker_wraps_bare_field() {
        let mut request = template();
        substitute(&mut request, Channel::Body, "userId", &json!(42), true);
        assert_eq!(request.body["owner"], json!("eq.42"));
    }

    #[test]
    fn test_only_first_matching_field_is_replaced() {
        let mut request = template();
        let key = substitute(&mut request, Channel::Header, "token", &json!("abc"), false);
        assert_eq!(key.as_deref(), Some("Authorization"));
        assert_eq!(request.headers["Authorization"], "abc");
        assert_eq!(request.headers["X-Trace"], "token");
    }

    #[test]
    fn test_numbers_become_text_in_headers_but_stay_typed_in_body() {
        let mut request = template();
        request.body.insert("id".into(), json!("userId2"));
        substitute(&mut request, Channel::Header, "token", &json!(7), false);
        substitute(&mut request, Channel::Body, "userId2", &json!(7), false);
        assert_eq!(request.headers["Authorization"], "7");
        assert_eq!(request.body["id"], json!(7));
    }

    #[test]
    fn test_unmatched_name_changes_nothing() {
        let mut request = template();
        let before = request.clone();
        assert!(substitute(&mut request, Channel::Param, "missing", &json!("v"), false).is_none());
        assert!(substitute(&mut request, Channel::EnvSelf, "token", &json!("v"), false).is_none());
        assert_eq!(request, before);
    }

    #[test]
    fn test_literal_values_are_not_placeholders() {
        let mut request = template();
        assert!(substitute(&mut request, Channel::Body, "count", &json!(5), false).is_none());
        assert_eq!(request.body["count"], json!(1));
    }
}
