//! Shared fixtures: a mock server on a random port and clients pointed at it.

#![allow(dead_code)]

use mock_server::MockState;
use postup_client::{ApiClient, ClientConfig, Credentials, MemoryCredentialStore, UreqTransport};

pub struct Server {
    pub state: MockState,
    pub base_url: String,
    pub token_url: String,
}

/// Start the mock server on a random port in a background thread.
pub fn spawn_server() -> Server {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let state = MockState::new();
    let server_state = state.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::serve(listener, server_state).await
        })
        .unwrap();
    });

    Server {
        state,
        base_url: format!("http://{addr}{}/", mock_server::API_PREFIX),
        token_url: format!("http://{addr}/token"),
    }
}

impl Server {
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, &self.token_url)
    }

    /// Credentials the server currently accepts.
    pub fn credentials(&self) -> Credentials {
        let tokens = self.state.tokens();
        Credentials::new(
            tokens.client_id,
            tokens.client_secret,
            tokens.access_token,
            tokens.refresh_token,
        )
    }

    /// Client over real HTTP with an in-memory store. The returned store
    /// handle observes every save.
    pub fn client(&self) -> (ApiClient, MemoryCredentialStore) {
        let store = MemoryCredentialStore::new(self.credentials());
        let client = ApiClient::new(self.config(), UreqTransport::new(), store.clone()).unwrap();
        (client, store)
    }
}

/// Short unique string for names and descriptions.
pub fn random_str() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}
