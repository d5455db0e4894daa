//! Error types for the postup API client.
//!
//! # Design
//! Callers mostly care about two things: the HTTP status of a failed call
//! (`Http`, exposed through `status_code`) and whether the credentials are
//! beyond repair (`Refresh`). An `ok: false` envelope inside a 2xx response
//! is an application failure and deliberately carries no status code.

/// Errors returned by `ApiClient` and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response that survived the single refresh-and-retry.
    #[error("failed to make api call to \"{path}\": HTTP {status}: {body}")]
    Http {
        path: String,
        status: u16,
        body: String,
    },

    /// 2xx response whose envelope reported `ok: false`.
    #[error("failed to fetch data: [{}] {}", display_status(.status), display_message(.message))]
    Envelope {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The refresh-token exchange failed. Fatal to the in-flight call.
    #[error("failed to refresh token: {reason}")]
    Refresh { status: Option<u16>, reason: String },

    /// No response was received.
    #[error("transport error: {0}")]
    Transport(String),

    /// The credential file is malformed.
    #[error("invalid credentials: {0}")]
    Credentials(String),

    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),
}

impl ApiError {
    /// HTTP status of a failed call, if the failure was an HTTP status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "None".to_string(), |s| s.to_string())
}

fn display_message(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("")
}
