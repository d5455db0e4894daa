//! The service's JSON envelope.
//!
//! Requests wrap their payload as `{"data": ...}`. Every response body is
//! `{"ok": true, "data": ...}` or `{"ok": false, "status": ..., "message": ...}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Request body wrapper.
#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a> {
    pub data: &'a Value,
}

/// Whether `payload` should be sent at all. `null`, `{}` and `[]` are
/// treated as no payload.
pub fn has_payload(payload: Option<&Value>) -> bool {
    match payload {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(_) => true,
    }
}

/// Serialize `payload` into a request body, or `None` when there is nothing
/// to send.
pub fn encode(payload: Option<&Value>) -> Result<Option<String>, ApiError> {
    match payload {
        Some(data) if has_payload(payload) => serde_json::to_string(&RequestEnvelope { data })
            .map(Some)
            .map_err(|e| ApiError::SerializationError(e.to_string())),
        _ => Ok(None),
    }
}

/// Decoded response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawEnvelope")]
pub enum Envelope {
    Success {
        data: Option<Value>,
    },
    Failure {
        status: Option<u16>,
        message: Option<String>,
    },
}

/// Wire form. Only `data` is read on success; `status` and `message` are
/// read leniently on failure because the server does not type them.
#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    ok: Value,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    status: Value,
    #[serde(default)]
    message: Value,
}

impl From<RawEnvelope> for Envelope {
    fn from(raw: RawEnvelope) -> Self {
        if truthy(&raw.ok) {
            Envelope::Success { data: raw.data }
        } else {
            Envelope::Failure {
                status: status_of(&raw.status),
                message: message_of(raw.message),
            }
        }
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are false.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A status that fits an HTTP code, given as a number or a numeric string.
fn status_of(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn message_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl Envelope {
    pub fn parse(body: &str) -> Result<Self, ApiError> {
        serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    /// The success payload, or `ApiError::Envelope` for a failure.
    pub fn into_data(self) -> Result<Option<Value>, ApiError> {
        match self {
            Envelope::Success { data } => Ok(data),
            Envelope::Failure { status, message } => Err(ApiError::Envelope { status, message }),
        }
    }
}

/// Convert unwrapped `data` into a typed value. Absent data decodes as JSON
/// `null`, so `Option<T>` and `()` targets accept it.
pub fn decode<T: DeserializeOwned>(data: Option<Value>) -> Result<T, ApiError> {
    serde_json::from_value(data.unwrap_or(Value::Null))
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}
