//! Role-based authentication and authorization gateway.
//!
//! The crate is split into a small set of cores and the glue around them:
//!
//! - [`auth`] — credential stores, password verification, the authentication
//!   evaluator, and the session-scoped principal context.
//! - [`authz`] — the ordered path-pattern policy engine.
//! - [`api`] — the axum HTTP surface (login, session, logout, health, and the
//!   policy-gated fallback route).
//! - [`cli`] — command-line parsing, telemetry setup, and action dispatch.

pub mod api;
pub mod auth;
pub mod authz;
pub mod cli;
