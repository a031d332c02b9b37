//! HTTP handlers for the gateway.
//!
//! `/login`, `/session`, `/logout`, and `/health` are always reachable; every
//! other path is decided by the policy gate.

pub mod gate;
pub mod health;
pub mod login;
pub mod session;
pub mod state;
pub mod types;

pub use state::{AppState, GateConfig};

#[cfg(test)]
mod tests;
