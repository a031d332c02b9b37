//! Access rule configuration and path pattern compilation.
//!
//! Rules come from a JSON file loaded once at startup: an ordered list of
//! `{pattern, roles}` entries. A trailing `/*` matches exactly one extra path
//! segment, `/**` matches one or more; anything else matches exactly. An
//! explicit `"match": "exact"` forces literal matching for patterns that
//! genuinely end in `*`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use thiserror::Error;

/// How a rule's pattern is matched against a request path.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    Exact,
    PrefixWildcard,
}

/// One ordered entry in the access policy file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleConfig {
    pub pattern: String,
    /// Roles that satisfy this rule; any one of them grants access.
    pub roles: BTreeSet<String>,
    /// Optional override; by default the mode is derived from the pattern.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_mode: Option<MatchMode>,
}

/// Rejected rule configurations.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("rule {index}: pattern {pattern:?} must start with '/'")]
    NotAbsolute { index: usize, pattern: String },
    #[error("rule {index}: pattern {pattern:?} has no trailing wildcard")]
    MissingWildcard { index: usize, pattern: String },
    #[error("rule {index}: pattern {pattern:?} has an empty role set")]
    EmptyRoles { index: usize, pattern: String },
}

/// A compiled path pattern.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum PathPattern {
    Exact(String),
    /// Prefix plus a trailing wildcard. `multi_segment` distinguishes `/**`
    /// from `/*`. The wildcard requires at least one extra segment, so
    /// `/hr_info/**` does not match `/hr_info` itself.
    Wildcard {
        prefix: String,
        multi_segment: bool,
    },
}

impl PathPattern {
    pub(crate) fn compile(index: usize, pattern: &str, mode: Option<MatchMode>) -> Result<Self, RuleError> {
        if !pattern.starts_with('/') {
            return Err(RuleError::NotAbsolute {
                index,
                pattern: pattern.to_string(),
            });
        }
        if mode == Some(MatchMode::Exact) {
            return Ok(Self::Exact(pattern.to_string()));
        }
        if let Some(prefix) = pattern.strip_suffix("/**") {
            return Ok(Self::Wildcard {
                prefix: prefix.to_string(),
                multi_segment: true,
            });
        }
        if let Some(prefix) = pattern.strip_suffix("/*") {
            return Ok(Self::Wildcard {
                prefix: prefix.to_string(),
                multi_segment: false,
            });
        }
        if mode == Some(MatchMode::PrefixWildcard) {
            return Err(RuleError::MissingWildcard {
                index,
                pattern: pattern.to_string(),
            });
        }
        Ok(Self::Exact(pattern.to_string()))
    }

    pub(crate) fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(pattern) => path == pattern,
            Self::Wildcard {
                prefix,
                multi_segment,
            } => {
                let Some(rest) = path.strip_prefix(prefix.as_str()) else {
                    return false;
                };
                let Some(rest) = rest.strip_prefix('/') else {
                    return false;
                };
                if rest.is_empty() {
                    return false;
                }
                *multi_segment || !rest.contains('/')
            }
        }
    }
}

/// Load the ordered rule list from a JSON file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub fn load_rules(path: &Path) -> Result<Vec<RuleConfig>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rules file: {}", path.display()))?;
    let rules: Vec<RuleConfig> = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse rules file: {}", path.display()))?;
    Ok(rules)
}
