use crate::api::{self, AppState, GateConfig};
use crate::auth::{
    Authenticator, CredentialStore, MemoryCredentialStore, PgCredentialStore, SessionStore,
};
use crate::authz::{load_rules, Policy};
use crate::cli::actions::Action;
use anyhow::{anyhow, bail, Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server {
            port,
            dsn,
            rules,
            users,
            lookup_timeout,
            session_ttl,
            secure_cookies,
        } => {
            let policy = Policy::from_rules(load_rules(&rules)?)
                .map_err(|err| anyhow!("invalid access rules: {err}"))?;
            info!("Loaded {} access rules", policy.rule_count());

            let store: Arc<dyn CredentialStore> = match users {
                Some(path) => {
                    info!("Using static users file: {}", path.display());
                    Arc::new(MemoryCredentialStore::from_file(&path)?)
                }
                None => {
                    let dsn = dsn.ok_or_else(|| anyhow!("either --users or --dsn is required"))?;
                    let parsed = Url::parse(&dsn).context("invalid database DSN")?;
                    if !matches!(parsed.scheme(), "postgres" | "postgresql") {
                        bail!("unsupported DSN scheme: {}", parsed.scheme());
                    }

                    let pool = PgPoolOptions::new()
                        .min_connections(1)
                        .max_connections(5)
                        .max_lifetime(Duration::from_secs(60 * 2))
                        .test_before_acquire(true)
                        .connect(&dsn)
                        .await
                        .context("Failed to connect to database")?;
                    Arc::new(PgCredentialStore::new(pool))
                }
            };

            let state = AppState::new(
                Authenticator::new(store, Duration::from_secs(lookup_timeout)),
                SessionStore::new(Duration::from_secs(session_ttl)),
                policy,
                GateConfig::new().with_cookie_secure(secure_cookies),
            );

            api::serve(port, state).await
        }
    }
}
