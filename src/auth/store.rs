//! Credential storage contract shared by the Postgres and in-memory backends.

use async_trait::async_trait;
use std::collections::BTreeSet;
use thiserror::Error;

use super::password::HashScheme;

/// Stored credential material for one username.
///
/// Owned by the store; it never crosses the authentication evaluator boundary.
#[derive(Clone, Debug)]
pub struct CredentialRecord {
    pub username: String,
    pub password_hash: String,
    pub algorithm: HashScheme,
    pub enabled: bool,
}

/// Failures surfaced by a credential store.
///
/// `NotFound` is kept apart from `Unavailable` so the evaluator can stay
/// fail-closed on outages without conflating them with absent usernames
/// internally. Both collapse to the same externally visible rejection.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username not found")]
    NotFound,
    #[error("credential store unavailable: {0}")]
    Unavailable(anyhow::Error),
}

/// Read-only lookup of credential material and role assignments.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Resolve a username to its stored credential record.
    async fn lookup(&self, username: &str) -> Result<CredentialRecord, StoreError>;

    /// Load the role assignments for a username. An unknown username yields an
    /// empty set, not `NotFound`; only `lookup` distinguishes absence.
    async fn roles(&self, username: &str) -> Result<BTreeSet<String>, StoreError>;
}
