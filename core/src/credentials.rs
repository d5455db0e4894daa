//! OAuth client credentials and the stores that persist them.
//!
//! # Design
//! The four credential strings travel as one `Credentials` value: they are
//! loaded together, replaced together after a refresh and saved together.
//! Persistence sits behind `CredentialStore` so the refresh logic never
//! knows whether the pair lives in a file or somewhere else.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ApiError;

/// Client id, client secret, access token and refresh token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Same client, new token pair.
    pub fn with_tokens(&self, access_token: String, refresh_token: String) -> Self {
        Self {
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            access_token,
            refresh_token,
        }
    }

    /// Value of the `authorization` header for API calls.
    pub fn authorization(&self) -> String {
        format!(
            "Bearer {}, Client {}, Secret {}",
            self.access_token, self.client_id, self.client_secret
        )
    }

    /// Parse the four-line credential file format.
    ///
    /// Lines are trimmed; anything after the fourth line is ignored.
    pub fn parse(contents: &str) -> Result<Self, ApiError> {
        let mut lines = contents.lines().map(str::trim);
        let mut next = |what: &str| {
            lines
                .next()
                .map(str::to_string)
                .ok_or_else(|| ApiError::Credentials(format!("missing {what}")))
        };
        Ok(Self {
            client_id: next("client id")?,
            client_secret: next("client secret")?,
            access_token: next("access token")?,
            refresh_token: next("refresh token")?,
        })
    }

    /// Render in the four-line credential file format.
    pub fn render(&self) -> String {
        format!(
            "{}\n{}\n{}\n{}\n",
            self.client_id, self.client_secret, self.access_token, self.refresh_token
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Where credentials are loaded from and written back to.
pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Credentials, ApiError>;

    /// Persist all four fields, replacing whatever was stored before.
    fn save(&self, credentials: &Credentials) -> Result<(), ApiError>;
}

/// Credentials kept in a four-line text file.
///
/// Saves write a temporary file next to the target and rename it over, so a
/// crash mid-write never leaves a half-written token pair behind.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Credentials, ApiError> {
        let contents = std::fs::read_to_string(&self.path)?;
        Credentials::parse(&contents)
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(credentials.render().as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot.
#[derive(Debug, Clone)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Credentials>>,
}

impl MemoryCredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            slot: Arc::new(Mutex::new(credentials)),
        }
    }

    /// Currently stored credentials.
    pub fn current(&self) -> Credentials {
        self.slot.lock().clone()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Credentials, ApiError> {
        Ok(self.current())
    }

    fn save(&self, credentials: &Credentials) -> Result<(), ApiError> {
        *self.slot.lock() = credentials.clone();
        Ok(())
    }
}
