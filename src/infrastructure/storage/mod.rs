//! Storage infrastructure - schema migrations

pub mod migrations;

pub use migrations::{Migration, PostgresMigrator, account_migrations, run_account_migrations};
