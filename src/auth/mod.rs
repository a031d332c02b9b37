//! Authentication core: credential stores, password verification, the
//! evaluator that turns a username/secret pair into a principal, and the
//! session store that holds principals for the lifetime of a session.

pub mod evaluator;
pub mod memory;
pub mod password;
pub mod postgres;
pub mod principal;
pub mod session;
pub mod store;

pub use evaluator::{AuthFailure, Authenticator};
pub use memory::{MemoryCredentialStore, StaticUser};
pub use password::HashScheme;
pub use postgres::PgCredentialStore;
pub use principal::Principal;
pub use session::SessionStore;
pub use store::{CredentialRecord, CredentialStore, StoreError};
