//! Account domain
//!
//! Domain types for account provisioning and authentication: the account
//! entity and its draft, the store trait, and input validation.

mod entity;
mod store;
mod validation;

pub use entity::{Account, AccountId, AccountRole, NewAccount, Transaction, TransactionKind};
pub use store::AccountStore;
pub use validation::{CredentialInputError, validate_login_input, validate_signup_input};

#[cfg(test)]
pub use store::mock::MockAccountStore;
