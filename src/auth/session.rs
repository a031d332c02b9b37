//! Session-scoped principal storage.
//!
//! Sessions are keyed by the SHA-256 hash of a random token; the raw token is
//! only returned to set the cookie and never stored. Principals are held
//! behind an `Arc`, so replacement swaps the whole principal at once — a
//! concurrent reader sees either the old principal or the new one, never a
//! partial update.

use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::principal::Principal;

struct SessionEntry {
    id: Uuid,
    principal: Arc<Principal>,
    created_at: Instant,
}

/// In-memory session store with a fixed TTL.
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Vec<u8>, SessionEntry>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Create a session for a freshly authenticated principal.
    ///
    /// Returns the raw token for the cookie; only its hash is retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the system RNG fails.
    pub async fn insert(&self, principal: Principal) -> Result<String> {
        let token = generate_session_token()?;
        let id = Uuid::new_v4();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, entry| entry.created_at.elapsed() < self.ttl);
        sessions.insert(
            hash_session_token(&token),
            SessionEntry {
                id,
                principal: Arc::new(principal),
                created_at: Instant::now(),
            },
        );
        debug!("session created: {id}");
        Ok(token)
    }

    /// Resolve a presented token to its principal, if the session is live.
    pub async fn resolve(&self, token: &str) -> Option<Arc<Principal>> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&hash_session_token(token))
            .filter(|entry| entry.created_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.principal))
    }

    /// Swap the principal of an existing live session (re-login on the same
    /// cookie). Returns `false` when the session is missing or expired.
    pub async fn replace(&self, token: &str, principal: Principal) -> bool {
        let mut sessions = self.sessions.lock().await;
        let Some(entry) = sessions.get_mut(&hash_session_token(token)) else {
            return false;
        };
        if entry.created_at.elapsed() >= self.ttl {
            return false;
        }
        entry.principal = Arc::new(principal);
        entry.created_at = Instant::now();
        debug!("session replaced: {}", entry.id);
        true
    }

    /// Clear a session. Revoking an unknown token is a no-op.
    pub async fn revoke(&self, token: &str) {
        let mut sessions = self.sessions.lock().await;
        if let Some(entry) = sessions.remove(&hash_session_token(token)) {
            debug!("session revoked: {}", entry.id);
        }
    }
}

fn generate_session_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session token")?;
    Ok(Base64UrlUnpadded::encode_string(&bytes))
}

fn hash_session_token(token: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}
