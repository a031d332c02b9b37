//! Authenticated principal attached to a session for its lifetime.

use std::collections::BTreeSet;

/// Identity resolved after a successful authentication.
///
/// Immutable once constructed; a fresh login produces a fresh principal. Every
/// principal carries at least one role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Principal {
    username: String,
    roles: BTreeSet<String>,
}

impl Principal {
    /// Build a principal from a username and its role assignments.
    ///
    /// Returns `None` when the role set is empty; an account with no roles can
    /// never pass authorization and must not look authenticated.
    #[must_use]
    pub fn new(username: impl Into<String>, roles: BTreeSet<String>) -> Option<Self> {
        if roles.is_empty() {
            return None;
        }
        Some(Self {
            username: username.into(),
            roles,
        })
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
