//! In-memory account store implementation

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::DomainError;
use crate::domain::account::{Account, AccountId, AccountStore, NewAccount};

#[derive(Debug, Default)]
struct StoreInner {
    accounts: HashMap<AccountId, Account>,
    email_index: HashMap<String, AccountId>,
    username_index: HashMap<String, AccountId>,
}

/// In-memory implementation of the account store, for development and tests.
///
/// Everything lives under one lock, so the duplicate check and the insert
/// are a single atomic step. That lock plays the role the unique indexes
/// play in the durable backend.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;
        Ok(inner
            .email_index
            .get(email)
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, DomainError> {
        let inner = self.inner.read().await;
        let id = inner
            .email_index
            .get(email)
            .or_else(|| inner.username_index.get(username));

        Ok(id.and_then(|id| inner.accounts.get(id)).cloned())
    }

    async fn insert(&self, draft: NewAccount) -> Result<Account, DomainError> {
        let mut inner = self.inner.write().await;

        if inner.email_index.contains_key(draft.email()) {
            return Err(DomainError::email_conflict(draft.email()));
        }

        if inner.username_index.contains_key(draft.username()) {
            return Err(DomainError::username_conflict(draft.username()));
        }

        let account = Account::new(AccountId::generate(), draft);

        inner
            .email_index
            .insert(account.email().to_string(), account.id());
        inner
            .username_index
            .insert(account.username().to_string(), account.id());
        inner.accounts.insert(account.id(), account.clone());

        Ok(account)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let mut inner = self.inner.write().await;

        if !inner.accounts.contains_key(&account.id()) {
            return Err(DomainError::not_found(format!(
                "account '{}' not found",
                account.id()
            )));
        }

        inner.accounts.insert(account.id(), account.clone());
        Ok(account.clone())
    }
}
