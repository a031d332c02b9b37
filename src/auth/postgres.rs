//! Postgres-backed credential store.
//!
//! Pure reads against the `users` and `user_roles` tables; the gateway never
//! mutates the credential store. See `sql/schema.sql` for the expected shape.

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use std::collections::BTreeSet;
use tracing::Instrument;

use super::password::HashScheme;
use super::store::{CredentialRecord, CredentialStore, StoreError};

/// Credential store backed by a shared Postgres pool.
#[derive(Clone, Debug)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn lookup(&self, username: &str) -> Result<CredentialRecord, StoreError> {
        let query = "SELECT username, password_hash, algorithm, enabled FROM users WHERE username = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| StoreError::Unavailable(anyhow!(err).context("credential lookup failed")))?
            .ok_or(StoreError::NotFound)?;

        let identifier: String = row.get("algorithm");
        // A record with an unrecognized algorithm is unusable; treat it like an
        // outage rather than silently failing the password check.
        let algorithm = HashScheme::parse(&identifier)
            .ok_or_else(|| StoreError::Unavailable(anyhow!("unknown hash algorithm: {identifier}")))?;

        Ok(CredentialRecord {
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            algorithm,
            enabled: row.get("enabled"),
        })
    }

    async fn roles(&self, username: &str) -> Result<BTreeSet<String>, StoreError> {
        let query = "SELECT role FROM user_roles WHERE username = $1";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(username)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .map_err(|err| StoreError::Unavailable(anyhow!(err).context("role lookup failed")))?;

        Ok(rows.iter().map(|row| row.get("role")).collect())
    }
}
