//! Shared handler state and gateway configuration.

use crate::auth::{Authenticator, SessionStore};
use crate::authz::Policy;

/// HTTP-facing knobs for the gateway.
#[derive(Clone, Debug)]
pub struct GateConfig {
    cookie_secure: bool,
}

impl GateConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cookie_secure: false,
        }
    }

    /// Mark session cookies `Secure`; enable when serving over HTTPS.
    #[must_use]
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the handlers need, wired once at startup and shared via
/// `Extension<Arc<AppState>>`.
pub struct AppState {
    authenticator: Authenticator,
    sessions: SessionStore,
    policy: Policy,
    config: GateConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        authenticator: Authenticator,
        sessions: SessionStore,
        policy: Policy,
        config: GateConfig,
    ) -> Self {
        Self {
            authenticator,
            sessions,
            policy,
            config,
        }
    }

    #[must_use]
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}
