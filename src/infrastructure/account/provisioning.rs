//! Account provisioning service

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::domain::DomainError;
use crate::domain::account::{
    Account, AccountId, AccountStore, NewAccount, Transaction, validate_signup_input,
};

use super::hasher::CredentialHasher;

/// Sanitized view of a freshly provisioned account: identifiers and the
/// ledger, never the credential hash.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionedAccount {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub money: Decimal,
    pub present_money: Decimal,
    pub profit: Decimal,
    pub transactions: Vec<Transaction>,
}

impl ProvisionedAccount {
    fn from_account(account: &Account) -> Self {
        Self {
            id: account.id(),
            email: account.email().to_string(),
            username: account.username().to_string(),
            money: account.money().unwrap_or(Decimal::ZERO),
            present_money: account.present_money().unwrap_or(Decimal::ZERO),
            profit: account.profit().unwrap_or(Decimal::ZERO),
            transactions: account
                .transactions()
                .map(<[Transaction]>::to_vec)
                .unwrap_or_default(),
        }
    }
}

/// Service that provisions new accounts: validates the input, hashes the
/// password, and persists a draft with the creation-time ledger defaults.
#[derive(Debug)]
pub struct AccountProvisioningService<S: AccountStore, H: CredentialHasher + 'static> {
    store: Arc<S>,
    hasher: Arc<H>,
}

impl<S: AccountStore, H: CredentialHasher + 'static> AccountProvisioningService<S, H> {
    pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self {
        Self { store, hasher }
    }

    /// Provision a new account.
    ///
    /// Fails with a validation error on missing input and a conflict error
    /// when the email or username is already taken; the conflict message
    /// names whichever field matched. Hashing only happens once the
    /// pre-check has passed.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<ProvisionedAccount, DomainError> {
        validate_signup_input(username, email, password)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        // Fail fast before hashing. The store's unique indexes still catch
        // the insert that races past this check.
        if let Some(existing) = self.store.find_by_email_or_username(email, username).await? {
            if existing.email() == email {
                return Err(DomainError::email_conflict(email));
            }
            return Err(DomainError::username_conflict(username));
        }

        let password_hash = self.hash_password(password).await?;
        let draft = NewAccount::new(username, email, password_hash);

        let mut account = self.store.insert(draft).await?;

        // A backend that drops zero-valued or empty-collection fields hands
        // the record back with holes in the ledger. Fill the holes once and
        // persist, so a re-fetch by id always sees the creation defaults.
        if !account.has_complete_ledger() {
            warn!(
                account_id = %account.id(),
                "inserted account came back with an incomplete ledger, re-applying defaults"
            );
            account.apply_ledger_defaults();
            account = self.store.update(&account).await?;
        }

        info!(account_id = %account.id(), username = %account.username(), "account provisioned");

        Ok(ProvisionedAccount::from_account(&account))
    }

    /// Hash on the blocking pool; bcrypt is CPU-bound and would stall the
    /// runtime worker otherwise.
    async fn hash_password(&self, password: &str) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::hashing(format!("hashing task failed: {}", e)))?
    }
}
