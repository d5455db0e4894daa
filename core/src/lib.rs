//! Blocking client for the postup quest-tracking API.
//!
//! # Overview
//! Every call carries an OAuth bearer token together with the client id and
//! secret. When the service answers 401 or 403 the client exchanges its
//! refresh token once, persists the new pair and retries the call once.
//! Responses arrive in a `{"ok", "data"}` envelope that the client unwraps
//! into the bare `data` value.
//!
//! # Design
//! - `ApiClient` owns its credentials behind a mutex and writes them through
//!   a `CredentialStore` after every refresh.
//! - `Transport` is the only I/O seam; `UreqTransport` is the production one.
//! - Request building and response unwrapping are pure, so most behaviour is
//!   testable without a server.

pub mod client;
pub mod config;
pub mod credentials;
pub mod envelope;
pub mod error;
pub mod http;
pub mod oauth;
pub mod types;

pub use client::{unwrap_response, ApiClient};
pub use config::ClientConfig;
pub use credentials::{CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore};
pub use envelope::{decode, Envelope};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use types::{Checkbox, CheckboxUpdate, CreatedQuest, NewQuest, Player, Quest, QuestMap};
