//! Authorization core: ordered path-pattern rules evaluated first-match-wins,
//! with an explicit default-deny for unmatched paths.

pub mod policy;
pub mod rules;

pub use policy::{Decision, DenyReason, Policy};
pub use rules::{load_rules, MatchMode, RuleConfig, RuleError};
