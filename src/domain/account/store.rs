//! Account store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{Account, AccountId, NewAccount};
use crate::domain::error::DomainError;

/// Durable persistence for accounts.
///
/// Implementations must enforce email and username uniqueness at the storage
/// level: when two inserts race on the same value, at most one succeeds and
/// the loser observes a conflict error naming the duplicated field. Reads
/// always reflect the latest committed state; there is no read cache in
/// front of the store.
#[async_trait]
pub trait AccountStore: Send + Sync + Debug {
    /// Look up an account by its identifier
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Look up an account by email. This is the login lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError>;

    /// Look up an account matching either the email or the username. Used by
    /// the signup pre-check; when both match different accounts, the email
    /// match wins.
    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, DomainError>;

    /// Persist a draft, assigning its identifier, and return the record as
    /// committed. Fails with a conflict when the email or username is
    /// already taken, even when a concurrent insert slipped past the
    /// caller's pre-check.
    async fn insert(&self, draft: NewAccount) -> Result<Account, DomainError>;

    /// Persist the mutable state of an existing account (the ledger fields
    /// and the last-modified timestamp) and return the fresh record. Used by
    /// the post-insert ledger normalization.
    async fn update(&self, account: &Account) -> Result<Account, DomainError>;
}

#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::RwLock;

    use super::*;

    /// Mock account store for service-level tests. Besides the plain
    /// in-memory behavior it can be told to fail outright or to hand back
    /// inserted records without their ledger fields, the way a document
    /// backend that drops empty fields would.
    #[derive(Debug, Default)]
    pub struct MockAccountStore {
        accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
        should_fail: Arc<RwLock<bool>>,
        strip_ledger_on_insert: Arc<RwLock<bool>>,
        update_calls: Arc<AtomicUsize>,
    }

    impl MockAccountStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Make every operation fail with a storage error
        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.write().await = fail;
        }

        /// Drop the ledger fields from inserted records
        pub async fn set_strip_ledger_on_insert(&self, strip: bool) {
            *self.strip_ledger_on_insert.write().await = strip;
        }

        /// How many times `update` has been called
        pub fn update_calls(&self) -> usize {
            self.update_calls.load(Ordering::SeqCst)
        }

        async fn check_should_fail(&self) -> Result<(), DomainError> {
            if *self.should_fail.read().await {
                return Err(DomainError::storage("mock store configured to fail"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl AccountStore for MockAccountStore {
        async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
            self.check_should_fail().await?;

            let accounts = self.accounts.read().await;
            Ok(accounts.get(id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
            self.check_should_fail().await?;

            let accounts = self.accounts.read().await;
            Ok(accounts.values().find(|a| a.email() == email).cloned())
        }

        async fn find_by_email_or_username(
            &self,
            email: &str,
            username: &str,
        ) -> Result<Option<Account>, DomainError> {
            self.check_should_fail().await?;

            let accounts = self.accounts.read().await;
            let by_email = accounts.values().find(|a| a.email() == email);
            let by_username = accounts.values().find(|a| a.username() == username);
            Ok(by_email.or(by_username).cloned())
        }

        async fn insert(&self, draft: NewAccount) -> Result<Account, DomainError> {
            self.check_should_fail().await?;

            let mut accounts = self.accounts.write().await;

            if accounts.values().any(|a| a.email() == draft.email()) {
                return Err(DomainError::email_conflict(draft.email()));
            }

            if accounts.values().any(|a| a.username() == draft.username()) {
                return Err(DomainError::username_conflict(draft.username()));
            }

            let mut account = Account::new(AccountId::generate(), draft);

            if *self.strip_ledger_on_insert.read().await {
                account.clear_ledger();
            }

            accounts.insert(account.id(), account.clone());
            Ok(account)
        }

        async fn update(&self, account: &Account) -> Result<Account, DomainError> {
            self.check_should_fail().await?;
            self.update_calls.fetch_add(1, Ordering::SeqCst);

            let mut accounts = self.accounts.write().await;

            if !accounts.contains_key(&account.id()) {
                return Err(DomainError::not_found(format!(
                    "account '{}' not found",
                    account.id()
                )));
            }

            accounts.insert(account.id(), account.clone());
            Ok(account.clone())
        }
    }
}
