//! Captured responses, the durable result store and scenario summaries

mod store;
mod summary;

pub use store::{ResultStore, ScenarioResults};
pub use summary::{summarize, FailedEndpoint, ScenarioSummary};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::CallFailure;
use crate::http::RawResponse;

/// Keys of the normalized response shape
const CAPTURED_FIELDS: [&str; 3] = ["status_code", "body", "error"];

/// Normalized outcome of one API call
///
/// Serialized as `{status_code, body, error}`. Deserialization also accepts a
/// bare body (any JSON that is not that shape), which is how hand-written
/// interaction files usually seed a `response`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct CapturedResponse {
    pub status_code: Option<u16>,
    pub body: Option<Value>,
    pub error: Option<String>,
}

impl CapturedResponse {
    /// Normalize an HTTP response: JSON body when it parses, raw text plus
    /// the reason phrase otherwise
    pub fn from_raw(raw: &RawResponse) -> Self {
        match serde_json::from_slice::<Value>(&raw.body) {
            Ok(body) => Self {
                status_code: Some(raw.status),
                body: Some(body),
                error: None,
            },
            Err(_) => {
                let reason = raw.reason.clone().unwrap_or_else(|| "Unknown".to_string());
                Self {
                    status_code: Some(raw.status),
                    body: Some(Value::String(raw.text())),
                    error: Some(CallFailure::NonJsonResponse(reason).to_string()),
                }
            }
        }
    }

    /// Response recorded when the transport produced nothing
    pub fn no_response(detail: impl Into<String>) -> Self {
        Self {
            status_code: None,
            body: None,
            error: Some(CallFailure::NoResponse(detail.into()).to_string()),
        }
    }

    /// 2xx status with no recorded error
    pub fn is_success(&self) -> bool {
        matches!(self.status_code, Some(code) if (200..300).contains(&code))
            && self.error.as_deref().map_or(true, str::is_empty)
    }
}

impl From<Value> for CapturedResponse {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::default(),
            Value::Object(map) if map.keys().all(|k| CAPTURED_FIELDS.contains(&k.as_str())) => {
                let status_code = map.get("status_code").and_then(|code| match code {
                    Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                    Value::String(s) => s.trim().parse().ok(),
                    _ => None,
                });
                Self {
                    status_code,
                    body: map.get("body").filter(|b| !b.is_null()).cloned(),
                    error: map.get("error").and_then(Value::as_str).map(String::from),
                }
            }
            other => Self {
                status_code: None,
                body: Some(other),
                error: None,
            },
        }
    }
}
