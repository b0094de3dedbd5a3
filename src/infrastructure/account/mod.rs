//! Account infrastructure module
//!
//! Implementations behind the account domain: bcrypt credential hashing,
//! the in-memory and PostgreSQL stores, and the provisioning and
//! authentication services.

mod authentication;
mod hasher;
mod memory_store;
mod postgres_store;
mod provisioning;

pub use authentication::{AuthenticatedAccount, AuthenticationService};
pub use hasher::{BcryptHasher, CredentialHasher, DEFAULT_HASH_COST, matches_hash_format};
pub use memory_store::InMemoryAccountStore;
pub use postgres_store::PostgresAccountStore;
pub use provisioning::{AccountProvisioningService, ProvisionedAccount};
