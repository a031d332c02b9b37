//! Authentication evaluator: username + secret in, principal or rejection out.
//!
//! Security boundaries: unknown usernames, store outages, and lookup timeouts
//! all collapse into the same `InvalidCredentials` rejection as a wrong
//! password, so responses never reveal which usernames exist. Store faults are
//! logged here and go no further.

use secrecy::SecretString;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{error, warn};

use super::password;
use super::principal::Principal;
use super::store::{CredentialStore, StoreError};

/// Externally visible reasons an authentication attempt was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthFailure {
    /// Unknown username, wrong password, or a store fault. Deliberately one
    /// reason for all three.
    InvalidCredentials,
    /// Known account with `enabled = false`.
    AccountDisabled,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::AccountDisabled => write!(f, "account disabled"),
        }
    }
}

/// Evaluates credentials against a store within a configured lookup timeout.
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    lookup_timeout: Duration,
}

impl Authenticator {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            lookup_timeout,
        }
    }

    /// Authenticate a username/secret pair.
    ///
    /// Read-only: no lookup or verification mutates the credential store.
    ///
    /// # Errors
    ///
    /// Returns [`AuthFailure`] with the externally visible rejection reason.
    pub async fn authenticate(
        &self,
        username: &str,
        secret: &SecretString,
    ) -> Result<Principal, AuthFailure> {
        let record = match timeout(self.lookup_timeout, self.store.lookup(username)).await {
            Ok(Ok(record)) => record,
            Ok(Err(StoreError::NotFound)) => return Err(AuthFailure::InvalidCredentials),
            Ok(Err(StoreError::Unavailable(err))) => {
                error!("credential store unavailable: {err:#}");
                return Err(AuthFailure::InvalidCredentials);
            }
            Err(_) => {
                error!(
                    "credential lookup timed out after {:?}",
                    self.lookup_timeout
                );
                return Err(AuthFailure::InvalidCredentials);
            }
        };

        if !record.enabled {
            return Err(AuthFailure::AccountDisabled);
        }

        if !password::verify(secret, &record.password_hash, record.algorithm) {
            return Err(AuthFailure::InvalidCredentials);
        }

        let roles = match timeout(self.lookup_timeout, self.store.roles(username)).await {
            Ok(Ok(roles)) => roles,
            Ok(Err(err)) => {
                error!("role lookup failed: {err}");
                return Err(AuthFailure::InvalidCredentials);
            }
            Err(_) => {
                error!("role lookup timed out after {:?}", self.lookup_timeout);
                return Err(AuthFailure::InvalidCredentials);
            }
        };

        Principal::new(record.username, roles).ok_or_else(|| {
            warn!("refusing login for account with no role assignments");
            AuthFailure::InvalidCredentials
        })
    }
}
