//! In-memory credential store backed by a static user list.
//!
//! Selected by configuration (`--users`) for deployments without a database;
//! the same `CredentialStore` contract as the Postgres backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use super::password::HashScheme;
use super::store::{CredentialRecord, CredentialStore, StoreError};

/// One statically configured user, as read from the users file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StaticUser {
    pub username: String,
    pub password_hash: String,
    pub algorithm: HashScheme,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub roles: BTreeSet<String>,
}

fn default_enabled() -> bool {
    true
}

/// Credential store over a fixed in-memory user map.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    users: HashMap<String, StaticUser>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = StaticUser>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// Load a JSON users file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read users file: {}", path.display()))?;
        let users: Vec<StaticUser> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse users file: {}", path.display()))?;
        Ok(Self::new(users))
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn lookup(&self, username: &str) -> Result<CredentialRecord, StoreError> {
        let user = self.users.get(username).ok_or(StoreError::NotFound)?;
        Ok(CredentialRecord {
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            algorithm: user.algorithm,
            enabled: user.enabled,
        })
    }

    async fn roles(&self, username: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(self
            .users
            .get(username)
            .map(|user| user.roles.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password;

    fn store() -> MemoryCredentialStore {
        MemoryCredentialStore::new([StaticUser {
            username: "darya".to_string(),
            password_hash: password::sha256_hash("darya"),
            algorithm: HashScheme::Sha256,
            enabled: true,
            roles: ["HR".to_string()].into_iter().collect(),
        }])
    }

    #[tokio::test]
    async fn lookup_returns_record_for_known_user() {
        let record = store().lookup("darya").await.unwrap();
        assert_eq!(record.username, "darya");
        assert_eq!(record.algorithm, HashScheme::Sha256);
        assert!(record.enabled);
    }

    #[tokio::test]
    async fn lookup_distinguishes_not_found() {
        let err = store().lookup("nobody").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn roles_empty_for_unknown_user() {
        assert!(store().roles("nobody").await.unwrap().is_empty());
        assert!(store().roles("darya").await.unwrap().contains("HR"));
    }

    #[test]
    fn users_file_parses_with_default_enabled() {
        let json = r#"[
            {
                "username": "ilya",
                "password_hash": "hash",
                "algorithm": "argon2id",
                "roles": ["EMPLOYEE"]
            }
        ]"#;
        let users: Vec<StaticUser> = serde_json::from_str(json).unwrap();
        assert!(users[0].enabled);
        assert_eq!(users[0].algorithm, HashScheme::Argon2id);
    }
}
