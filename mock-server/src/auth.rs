//! Bearer-token check for the API routes and the OAuth token endpoint.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::reply::Failure;
use crate::state::{now, MockState};

/// Reject API calls whose `authorization` header does not match the current
/// token pair exactly.
pub async fn require_token(State(state): State<MockState>, request: Request, next: Next) -> Response {
    state.count_api_request();

    let expected = state.tokens().authorization();
    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if provided != Some(expected.as_str()) {
        debug!(uri = %request.uri(), "rejecting request with stale or missing token");
        return Failure::unauthorized("invalid or expired access token").into_response();
    }

    state.db().write().await.touch(now());
    next.run(request).await
}

#[derive(Deserialize)]
pub struct TokenForm {
    pub client_id: String,
    pub client_secret: String,
    pub grant_type: String,
    pub refresh_token: String,
    #[serde(default)]
    pub scope: Option<String>,
}

fn oauth_error(status: StatusCode, error: &str, description: &str) -> Response {
    (
        status,
        Json(json!({ "error": error, "error_description": description })),
    )
        .into_response()
}

/// Refresh-token grant. Rotates both tokens on success.
pub async fn token(State(state): State<MockState>, Form(form): Form<TokenForm>) -> Response {
    let issued = state.tokens();
    if form.client_id != issued.client_id || form.client_secret != issued.client_secret {
        return oauth_error(StatusCode::UNAUTHORIZED, "invalid_client", "unknown client");
    }
    if form.grant_type != "refresh_token" {
        return oauth_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            "only refresh_token is supported",
        );
    }

    match state.rotate(&form.refresh_token) {
        Some(tokens) => {
            info!(scope = form.scope.as_deref().unwrap_or(""), "issued new token pair");
            Json(json!({
                "access_token": tokens.access_token,
                "refresh_token": tokens.refresh_token,
                "token_type": "Bearer",
                "expires_in": 3600,
            }))
            .into_response()
        }
        None => oauth_error(StatusCode::BAD_REQUEST, "invalid_grant", "refresh token is not valid"),
    }
}
