//! Shared server state: the resource tables and the OAuth token pair.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Daily, Player, Quest, Regular};

/// Credentials the server currently accepts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IssuedTokens {
    pub client_id: String,
    pub client_secret: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl IssuedTokens {
    fn generate() -> Self {
        Self {
            client_id: Uuid::new_v4().simple().to_string(),
            client_secret: Uuid::new_v4().simple().to_string(),
            access_token: fresh_token(),
            refresh_token: fresh_token(),
        }
    }

    /// The exact `authorization` header an API call must carry.
    pub fn authorization(&self) -> String {
        format!(
            "Bearer {}, Client {}, Secret {}",
            self.access_token, self.client_id, self.client_secret
        )
    }
}

fn fresh_token() -> String {
    Uuid::new_v4().simple().to_string()
}

pub struct QuestRecord {
    pub quest: Quest,
    pub prereqs: Vec<Uuid>,
    /// Companion quest of a daily.
    pub daily: bool,
}

pub struct Db {
    pub quests: HashMap<Uuid, QuestRecord>,
    pub dailies: HashMap<Uuid, Daily>,
    pub regulars: HashMap<Uuid, Regular>,
    pub player: Player,
    last_request: f64,
}

impl Db {
    fn new() -> Self {
        let now = now();
        Self {
            quests: HashMap::new(),
            dailies: HashMap::new(),
            regulars: HashMap::new(),
            player: Player {
                last_seen: now,
                experience: 0,
            },
            last_request: now,
        }
    }

    /// Record an authenticated request. `last_seen` lags one request behind
    /// so a client reading it always sees a moment in the past.
    pub fn touch(&mut self, at: f64) {
        self.player.last_seen = self.last_request;
        self.last_request = at;
    }
}

struct Inner {
    db: RwLock<Db>,
    tokens: Mutex<IssuedTokens>,
    refreshes: AtomicUsize,
    api_requests: AtomicUsize,
}

/// Cheap to clone; all clones share one server.
#[derive(Clone)]
pub struct MockState {
    inner: Arc<Inner>,
}

impl Default for MockState {
    fn default() -> Self {
        Self::new()
    }
}

impl MockState {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                db: RwLock::new(Db::new()),
                tokens: Mutex::new(IssuedTokens::generate()),
                refreshes: AtomicUsize::new(0),
                api_requests: AtomicUsize::new(0),
            }),
        }
    }

    pub fn db(&self) -> &RwLock<Db> {
        &self.inner.db
    }

    fn lock_tokens(&self) -> MutexGuard<'_, IssuedTokens> {
        self.inner
            .tokens
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn tokens(&self) -> IssuedTokens {
        self.lock_tokens().clone()
    }

    /// Invalidate the current access token. The refresh token stays valid.
    pub fn expire_access_token(&self) {
        self.lock_tokens().access_token = fresh_token();
    }

    /// Invalidate the current refresh token so the next grant fails.
    pub fn revoke_refresh_token(&self) {
        self.lock_tokens().refresh_token = fresh_token();
    }

    /// Rotate both tokens if `refresh_token` is the current one.
    pub fn rotate(&self, refresh_token: &str) -> Option<IssuedTokens> {
        let mut tokens = self.lock_tokens();
        if tokens.refresh_token != refresh_token {
            return None;
        }
        tokens.access_token = fresh_token();
        tokens.refresh_token = fresh_token();
        self.inner.refreshes.fetch_add(1, Ordering::SeqCst);
        Some(tokens.clone())
    }

    /// Successful refresh-token grants served so far.
    pub fn refresh_count(&self) -> usize {
        self.inner.refreshes.load(Ordering::SeqCst)
    }

    /// Requests that reached the API routes, rejected ones included.
    pub fn api_requests(&self) -> usize {
        self.inner.api_requests.load(Ordering::SeqCst)
    }

    pub(crate) fn count_api_request(&self) {
        self.inner.api_requests.fetch_add(1, Ordering::SeqCst);
    }
}

/// Seconds since the Unix epoch.
pub fn now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_requires_current_refresh_token() {
        let state = MockState::new();
        let before = state.tokens();
        assert!(state.rotate("wrong").is_none());
        assert_eq!(state.refresh_count(), 0);

        let after = state.rotate(&before.refresh_token).unwrap();
        assert_ne!(after.access_token, before.access_token);
        assert_ne!(after.refresh_token, before.refresh_token);
        assert_eq!(after.client_id, before.client_id);
        assert_eq!(state.refresh_count(), 1);
        assert!(state.rotate(&before.refresh_token).is_none());
    }

    #[test]
    fn expire_keeps_refresh_token() {
        let state = MockState::new();
        let before = state.tokens();
        state.expire_access_token();
        let after = state.tokens();
        assert_ne!(after.access_token, before.access_token);
        assert_eq!(after.refresh_token, before.refresh_token);
    }

    #[test]
    fn touch_reports_previous_request() {
        let mut db = Db::new();
        let start = db.player.last_seen;
        db.touch(start + 10.0);
        assert_eq!(db.player.last_seen, start);
        db.touch(start + 20.0);
        assert_eq!(db.player.last_seen, start + 10.0);
    }
}
