//! Server-side login sessions.
//!
//! Sessions live in memory, keyed by an opaque random id that clients send
//! back as a bearer token. Each session expires after a fixed TTL.

use rand::Rng;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Data associated with a session id.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub expires_at: Instant,
}

/// Longest lifetime a session can be given.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// In-memory session store with expiry.
///
/// Thread-safe via internal RwLock.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Creates a store whose sessions last `ttl_minutes`.
    pub fn new(ttl_minutes: u64) -> Self {
        Self::with_ttl(Duration::from_secs(ttl_minutes.saturating_mul(60)))
    }

    /// Lifetimes beyond [`MAX_TTL`] are clamped to it.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: ttl.min(MAX_TTL),
        }
    }

    /// Starts a session for the user and returns its id
    /// (32 bytes, base64url encoded).
    pub fn create(&self, user_id: i64) -> String {
        let id = generate_session_id();
        let session = Session {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };

        self.sessions.write().unwrap().insert(id.clone(), session);
        tracing::debug!("Session started for user {}", user_id);

        id
    }

    /// Returns the live session for `id`.
    ///
    /// An expired session is removed and treated as unknown.
    pub fn get(&self, id: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().unwrap();
            match sessions.get(id) {
                Some(session) if Instant::now() <= session.expires_at => {
                    return Some(session.clone())
                }
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().unwrap().remove(id);
        None
    }

    /// Ends a session. Returns true if it existed.
    pub fn destroy(&self, id: &str) -> bool {
        self.sessions.write().unwrap().remove(id).is_some()
    }

    /// Removes all expired sessions.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write().unwrap();
        let now = Instant::now();

        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.read().unwrap().len()
    }
}

/// Returns 32 random bytes encoded as base64url (no padding).
fn generate_session_id() -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

    let mut bytes = [0u8; 32];
    rand::rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
