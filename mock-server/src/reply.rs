//! Envelope helpers: `{"ok": true, "data": ...}` on success and
//! `{"ok": false, "status": ..., "message": ...}` on failure.

use axum::{
    body::Bytes,
    extract::{FromRequestParts, Path},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};

pub type Reply = Result<Json<Value>, Failure>;

pub fn ok<T: Serialize>(data: T) -> Reply {
    Ok(Json(json!({ "ok": true, "data": data })))
}

pub fn ok_empty() -> Reply {
    Ok(Json(json!({ "ok": true })))
}

#[derive(Debug)]
pub struct Failure {
    pub status: StatusCode,
    pub message: String,
}

impl Failure {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "ok": false,
            "status": self.status.as_u16(),
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Path parameters. A malformed segment is a 400 envelope rather than
/// axum's plain-text rejection.
pub struct Id<T>(pub T);

impl<S, T> FromRequestParts<S> for Id<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Id(value))
            .map_err(|rejection| Failure::new(rejection.status(), rejection.body_text()))
    }
}

#[derive(Deserialize)]
struct RequestEnvelope<T> {
    data: T,
}

/// Decode a `{"data": ...}` request body. Missing body, bad JSON and
/// schema mismatches are all 400s.
pub fn payload<T: DeserializeOwned>(body: &Bytes) -> Result<T, Failure> {
    if body.is_empty() {
        return Err(Failure::bad_request("missing request data"));
    }
    serde_json::from_slice::<RequestEnvelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|e| Failure::bad_request(format!("invalid request data: {e}")))
}

/// Like `payload`, but an empty body means "no changes".
pub fn payload_or_default<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Failure> {
    if body.is_empty() {
        return Ok(T::default());
    }
    payload(body)
}
