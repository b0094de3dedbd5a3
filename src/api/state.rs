//! Application state for shared services

use std::sync::Arc;

use crate::domain::DomainError;
use crate::domain::account::AccountStore;
use crate::infrastructure::account::{
    AccountProvisioningService, AuthenticatedAccount, AuthenticationService, CredentialHasher,
    ProvisionedAccount,
};

/// Application state holding the account services behind dynamic dispatch,
/// so handlers stay independent of the store and hasher types picked at
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub provisioning_service: Arc<dyn ProvisioningServiceTrait>,
    pub authentication_service: Arc<dyn AuthenticationServiceTrait>,
}

impl AppState {
    pub fn new(
        provisioning_service: Arc<dyn ProvisioningServiceTrait>,
        authentication_service: Arc<dyn AuthenticationServiceTrait>,
    ) -> Self {
        Self {
            provisioning_service,
            authentication_service,
        }
    }
}

/// Trait for account provisioning operations
#[async_trait::async_trait]
pub trait ProvisioningServiceTrait: Send + Sync {
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<ProvisionedAccount, DomainError>;
}

/// Trait for authentication operations
#[async_trait::async_trait]
pub trait AuthenticationServiceTrait: Send + Sync {
    async fn login(&self, email: &str, password: &str)
    -> Result<AuthenticatedAccount, DomainError>;
}

#[async_trait::async_trait]
impl<S, H> ProvisioningServiceTrait for AccountProvisioningService<S, H>
where
    S: AccountStore,
    H: CredentialHasher + 'static,
{
    async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<ProvisionedAccount, DomainError> {
        AccountProvisioningService::signup(self, username, email, password).await
    }
}

#[async_trait::async_trait]
impl<S, H> AuthenticationServiceTrait for AuthenticationService<S, H>
where
    S: AccountStore,
    H: CredentialHasher + 'static,
{
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, DomainError> {
        AuthenticationService::login(self, email, password).await
    }
}
