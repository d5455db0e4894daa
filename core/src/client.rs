//! Authenticated client for the postup API.
//!
//! # Design
//! Request construction (`build_request`) and response interpretation
//! (`unwrap_response`) are pure functions of their inputs; only `call`
//! performs I/O, through the injected `Transport`.
//!
//! A call that comes back 401 or 403 triggers one refresh-token exchange and
//! one retry. The refresh runs while holding the credentials lock, and is
//! skipped when another caller already replaced the token this call used, so
//! concurrent failures cost a single exchange.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::credentials::{CredentialStore, Credentials, FileCredentialStore};
use crate::envelope::{self, Envelope};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::oauth;

/// Client for the postup REST API.
pub struct ApiClient<T = UreqTransport> {
    config: ClientConfig,
    transport: T,
    store: Box<dyn CredentialStore>,
    credentials: Mutex<Credentials>,
}

impl ApiClient<UreqTransport> {
    /// Client over HTTP using the credential file named in `config`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = UreqTransport::with_timeout(config.timeout);
        let store = FileCredentialStore::new(config.credentials_path.clone());
        Self::new(config, transport, store)
    }
}

impl<T: Transport> ApiClient<T> {
    /// Load credentials from `store` and build a client.
    pub fn new(
        config: ClientConfig,
        transport: T,
        store: impl CredentialStore + 'static,
    ) -> Result<Self, ApiError> {
        let credentials = store.load()?;
        Ok(Self {
            config,
            transport,
            store: Box::new(store),
            credentials: Mutex::new(credentials),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Snapshot of the credentials currently in use.
    pub fn credentials(&self) -> Credentials {
        self.credentials.lock().clone()
    }

    pub fn get(&self, path: &str, data: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.call(HttpMethod::Get, path, data)
    }

    pub fn post(&self, path: &str, data: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.call(HttpMethod::Post, path, data)
    }

    pub fn put(&self, path: &str, data: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.call(HttpMethod::Put, path, data)
    }

    pub fn patch(&self, path: &str, data: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.call(HttpMethod::Patch, path, data)
    }

    pub fn delete(&self, path: &str, data: Option<&Value>) -> Result<Option<Value>, ApiError> {
        self.call(HttpMethod::Delete, path, data)
    }

    /// Issue `method` on `path`, refreshing credentials at most once.
    pub fn call(
        &self,
        method: HttpMethod,
        path: &str,
        data: Option<&Value>,
    ) -> Result<Option<Value>, ApiError> {
        let body = envelope::encode(data)?;

        let used = self.credentials();
        let request = self.build_request(&used, method, path, body.clone());
        let mut response = self.transport.execute(&request)?;

        if response.is_auth_failure() {
            warn!(
                method = method.as_str(),
                path,
                status = response.status,
                "authorization rejected, refreshing token"
            );
            let refreshed = self.refresh(&used)?;
            let retry = self.build_request(&refreshed, method, path, body);
            response = self.transport.execute(&retry)?;
        }

        unwrap_response(path, response)
    }

    /// Exchange the refresh token for a new pair and persist it.
    ///
    /// `stale` is the credential snapshot the failed request was sent with.
    /// If the stored pair has moved on since, that newer pair is returned
    /// without another exchange.
    fn refresh(&self, stale: &Credentials) -> Result<Credentials, ApiError> {
        let mut current = self.credentials.lock();
        if current.access_token != stale.access_token {
            debug!("token already refreshed by another caller");
            return Ok(current.clone());
        }

        let request = oauth::build_refresh_request(&self.config.token_url, &current, &self.config.scope);
        let tokens = self
            .transport
            .execute(&request)
            .map_err(|e| ApiError::Refresh {
                status: None,
                reason: e.to_string(),
            })
            .and_then(oauth::parse_refresh_response)
            .inspect_err(|e| warn!(error = %e, "token refresh failed"))?;

        let updated = current.with_tokens(tokens.access_token, tokens.refresh_token);
        *current = updated.clone();
        self.store.save(&updated)?;
        info!("access token refreshed");
        Ok(updated)
    }

    /// Build the authenticated request for `path`. `body` is an already
    /// encoded request envelope.
    pub fn build_request(
        &self,
        credentials: &Credentials,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> HttpRequest {
        let mut headers = vec![("authorization".to_string(), credentials.authorization())];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: self.config.url(path),
            headers,
            body,
        }
    }
}

/// Map a final response to the envelope's `data`.
///
/// Non-2xx becomes `ApiError::Http` with the raw body; a 2xx envelope with
/// `ok: false` becomes `ApiError::Envelope`.
pub fn unwrap_response(path: &str, response: HttpResponse) -> Result<Option<Value>, ApiError> {
    if !response.is_success() {
        return Err(ApiError::Http {
            path: path.to_string(),
            status: response.status,
            body: response.body,
        });
    }
    Envelope::parse(&response.body)?.into_data()
}
