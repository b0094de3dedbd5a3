//! Paper trading API
//!
//! Account provisioning and authentication for a paper-trading platform:
//! bcrypt credential hashing, a uniqueness-enforcing account store (in-memory
//! or PostgreSQL), and signup/login services behind an axum adapter.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use api::state::AppState;
use config::StorageBackend;
use infrastructure::account::{
    AccountProvisioningService, AuthenticationService, BcryptHasher, InMemoryAccountStore,
    PostgresAccountStore,
};
use infrastructure::storage::run_account_migrations;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let hasher = Arc::new(BcryptHasher::new(config.auth.hash_cost));

    info!("Storage backend: {:?}", config.storage.backend);

    match config.storage.backend {
        StorageBackend::Postgres => {
            let database_url = config.storage.resolve_database_url().ok_or_else(|| {
                anyhow::anyhow!(
                    "postgres storage selected but no database URL configured \
                     (set DATABASE_URL or storage.database_url)"
                )
            })?;

            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.storage.max_connections)
                .connect(&database_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

            run_account_migrations(&pool).await?;
            info!("PostgreSQL connection established, migrations applied");

            let store = Arc::new(PostgresAccountStore::new(pool));
            Ok(build_state(store, hasher))
        }
        StorageBackend::Memory => {
            let store = Arc::new(InMemoryAccountStore::new());
            Ok(build_state(store, hasher))
        }
    }
}

fn build_state<S>(store: Arc<S>, hasher: Arc<BcryptHasher>) -> AppState
where
    S: domain::account::AccountStore + 'static,
{
    AppState::new(
        Arc::new(AccountProvisioningService::new(
            Arc::clone(&store),
            Arc::clone(&hasher),
        )),
        Arc::new(AuthenticationService::new(store, hasher)),
    )
}
