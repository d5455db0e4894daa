//! Refresh-token grant against the OAuth endpoint.

use serde::Deserialize;

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const GRANT_TYPE: &str = "refresh_token";

/// Token pair returned by a successful refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Form-encoded POST exchanging the current refresh token for a new pair.
pub fn build_refresh_request(token_url: &str, credentials: &Credentials, scope: &str) -> HttpRequest {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &credentials.client_id)
        .append_pair("client_secret", &credentials.client_secret)
        .append_pair("grant_type", GRANT_TYPE)
        .append_pair("refresh_token", &credentials.refresh_token)
        .append_pair("scope", scope)
        .finish();

    HttpRequest {
        method: HttpMethod::Post,
        path: token_url.to_string(),
        headers: vec![(
            "content-type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        )],
        body: Some(body),
    }
}

pub fn parse_refresh_response(response: HttpResponse) -> Result<TokenResponse, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Refresh {
            status: Some(response.status),
            reason: format!("HTTP {}: {}", response.status, response.body),
        });
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::Refresh {
        status: Some(response.status),
        reason: format!("malformed token response: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn refresh_request_is_form_encoded() {
        let creds = Credentials::new("id 1", "s&cret", "access", "refresh=");
        let req = build_refresh_request("https://oauth.example/token", &creds, "*");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "https://oauth.example/token");
        assert_eq!(
            req.header("content-type"),
            Some("application/x-www-form-urlencoded")
        );
        assert_eq!(req.header("authorization"), None);

        let pairs: Vec<(String, String)> =
            url::form_urlencoded::parse(req.body.as_deref().unwrap().as_bytes())
                .into_owned()
                .collect();
        assert_eq!(
            pairs,
            vec![
                ("client_id".to_string(), "id 1".to_string()),
                ("client_secret".to_string(), "s&cret".to_string()),
                ("grant_type".to_string(), "refresh_token".to_string()),
                ("refresh_token".to_string(), "refresh=".to_string()),
                ("scope".to_string(), "*".to_string()),
            ]
        );
    }

    #[test]
    fn parse_success_reads_both_tokens() {
        let tokens = parse_refresh_response(response(
            200,
            r#"{"access_token":"a2","refresh_token":"r2","token_type":"Bearer","expires_in":3600}"#,
        ))
        .unwrap();
        assert_eq!(tokens.access_token, "a2");
        assert_eq!(tokens.refresh_token, "r2");
        assert_eq!(tokens.expires_in, Some(3600));
    }

    #[test]
    fn parse_rejected_grant_is_refresh_error() {
        let err = parse_refresh_response(response(400, r#"{"error":"invalid_grant"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Refresh { status: Some(400), .. }));
        assert!(err.to_string().contains("invalid_grant"));
    }

    #[test]
    fn parse_missing_refresh_token_is_refresh_error() {
        let err = parse_refresh_response(response(200, r#"{"access_token":"a2"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::Refresh { .. }));
    }
}
