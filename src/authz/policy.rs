//! Ordered first-match policy evaluation.
//!
//! Rules are evaluated in declaration order and the first matching pattern
//! wins, even when a later rule would also match — a looser earlier pattern
//! masks a stricter later one, so rule order is part of the policy. Unmatched
//! paths are denied.

use std::collections::BTreeSet;
use std::fmt;

use super::rules::{PathPattern, RuleConfig, RuleError};
use crate::auth::principal::Principal;

/// Why a request was denied.
///
/// The two reasons drive different user-visible handling: an authentication
/// challenge versus a plain denial.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DenyReason {
    /// No live session; the caller should be sent to the login form.
    AuthenticationRequired,
    /// Authenticated but lacking every role the matching rule requires.
    Forbidden,
}

/// Outcome of a policy check.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny(DenyReason::AuthenticationRequired) => write!(f, "deny (authentication required)"),
            Self::Deny(DenyReason::Forbidden) => write!(f, "deny (forbidden)"),
        }
    }
}

#[derive(Debug)]
struct CompiledRule {
    pattern: PathPattern,
    roles: BTreeSet<String>,
}

/// Immutable access policy, compiled once at startup.
#[derive(Debug)]
pub struct Policy {
    rules: Vec<CompiledRule>,
}

impl Policy {
    /// Compile an ordered rule list.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError`] for malformed patterns or empty role sets.
    pub fn from_rules(rules: Vec<RuleConfig>) -> Result<Self, RuleError> {
        let mut compiled = Vec::with_capacity(rules.len());
        for (index, rule) in rules.into_iter().enumerate() {
            if rule.roles.is_empty() {
                return Err(RuleError::EmptyRoles {
                    index,
                    pattern: rule.pattern,
                });
            }
            let pattern = PathPattern::compile(index, &rule.pattern, rule.match_mode)?;
            compiled.push(CompiledRule {
                pattern,
                roles: rule.roles,
            });
        }
        Ok(Self { rules: compiled })
    }

    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Decide whether a (possibly anonymous) principal may access a path.
    ///
    /// Deterministic: depends only on the compiled rules and the arguments.
    #[must_use]
    pub fn authorize(&self, principal: Option<&Principal>, path: &str) -> Decision {
        for rule in &self.rules {
            if !rule.pattern.matches(path) {
                continue;
            }
            return match principal {
                None => Decision::Deny(DenyReason::AuthenticationRequired),
                Some(principal) if rule.roles.iter().any(|role| principal.has_role(role)) => {
                    Decision::Allow
                }
                Some(_) => Decision::Deny(DenyReason::Forbidden),
            };
        }
        // No rule matched: deny. Anonymous callers still get the login
        // challenge; a principal that is already authenticated gets a denial.
        match principal {
            None => Decision::Deny(DenyReason::AuthenticationRequired),
            Some(_) => Decision::Deny(DenyReason::Forbidden),
        }
    }
}
