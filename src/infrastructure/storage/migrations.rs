//! Database migrations infrastructure

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

/// Represents a database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version, ascending
    pub version: i64,
    /// Human-readable description
    pub description: String,
    /// SQL to run when applying the migration
    pub up: String,
}

impl Migration {
    pub fn new(version: i64, description: impl Into<String>, up: impl Into<String>) -> Self {
        Self {
            version,
            description: description.into(),
            up: up.into(),
        }
    }
}

/// PostgreSQL migrator with a `_migrations` bookkeeping table
#[derive(Debug)]
pub struct PostgresMigrator {
    pool: PgPool,
}

impl PostgresMigrator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the migrations table if it doesn't exist
    async fn ensure_migrations_table(&self) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL,
                installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to create migrations table: {}", e)))?;

        Ok(())
    }

    /// Runs a single migration. Returns `false` when it was already applied.
    pub async fn run_migration(&self, migration: &Migration) -> Result<bool, DomainError> {
        self.ensure_migrations_table().await?;

        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("failed to check migration status: {}", e))
                })?;

        if applied {
            return Ok(false);
        }

        // raw_sql: migration scripts hold several statements
        sqlx::raw_sql(&migration.up)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(&migration.description)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;

        Ok(true)
    }

    /// Returns the latest applied migration version
    pub async fn current_version(&self) -> Result<Option<i64>, DomainError> {
        self.ensure_migrations_table().await?;

        let version: Option<i64> =
            sqlx::query_scalar("SELECT MAX(version) FROM _migrations")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("failed to get migration version: {}", e))
                })?;

        Ok(version)
    }
}

/// The account schema.
///
/// The unique indexes in migration 1 are the storage-level uniqueness
/// guarantee for email and username; the store maps their duplicate-key
/// failures to conflict errors by index name. The ledger columns in
/// migration 2 are intentionally nullable: a NULL there is what the
/// post-insert defaulting pass detects and repairs.
pub fn account_migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "Create accounts table",
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id UUID PRIMARY KEY,
                username VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                password_hash VARCHAR(60) NOT NULL,
                role VARCHAR(32) NOT NULL DEFAULT 'user',
                is_verified BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            CREATE UNIQUE INDEX IF NOT EXISTS accounts_email_key ON accounts(email);
            CREATE UNIQUE INDEX IF NOT EXISTS accounts_username_key ON accounts(username);
            "#,
        ),
        Migration::new(
            2,
            "Add nullable ledger columns",
            r#"
            ALTER TABLE accounts ADD COLUMN IF NOT EXISTS money NUMERIC;
            ALTER TABLE accounts ADD COLUMN IF NOT EXISTS present_money NUMERIC;
            ALTER TABLE accounts ADD COLUMN IF NOT EXISTS profit NUMERIC;
            ALTER TABLE accounts ADD COLUMN IF NOT EXISTS transactions JSONB;
            "#,
        ),
    ]
}

/// Runs all pending account migrations
pub async fn run_account_migrations(pool: &PgPool) -> Result<(), DomainError> {
    let migrator = PostgresMigrator::new(pool.clone());

    for migration in account_migrations() {
        if migrator.run_migration(&migration).await? {
            info!(
                version = migration.version,
                description = %migration.description,
                "applied migration"
            );
        }
    }

    if let Some(version) = migrator.current_version().await? {
        info!(version, "database schema up to date");
    }

    Ok(())
}
