//! Authentication service

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::DomainError;
use crate::domain::account::{Account, AccountId, AccountRole, AccountStore, validate_login_input};

use super::hasher::CredentialHasher;

/// Sanitized view of an authenticated account. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub role: AccountRole,
    pub is_verified: bool,
}

impl AuthenticatedAccount {
    fn from_account(account: &Account) -> Self {
        Self {
            id: account.id(),
            email: account.email().to_string(),
            username: account.username().to_string(),
            role: account.role(),
            is_verified: account.is_verified(),
        }
    }
}

/// Service that verifies credentials at login.
///
/// Every failed login returns the same generic authentication error:
/// unknown email, wrong password and a malformed stored hash must not be
/// distinguishable from the response, or the endpoint becomes an account
/// enumeration oracle. Login performs no writes.
#[derive(Debug)]
pub struct AuthenticationService<S: AccountStore, H: CredentialHasher + 'static> {
    store: Arc<S>,
    hasher: Arc<H>,
}

impl<S: AccountStore, H: CredentialHasher + 'static> AuthenticationService<S, H> {
    pub fn new(store: Arc<S>, hasher: Arc<H>) -> Self {
        Self { store, hasher }
    }

    /// Verify the submitted credentials and return the account projection.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedAccount, DomainError> {
        validate_login_input(email, password).map_err(|e| DomainError::validation(e.to_string()))?;

        let account = match self.store.find_by_email(email).await? {
            Some(account) => account,
            None => {
                debug!("login rejected: no account for the submitted email");
                return Err(DomainError::invalid_credentials());
            }
        };

        let stored_hash = account.password_hash();

        if !self.hasher.is_well_formed(stored_hash) {
            // Structural facts only; never the hash material itself.
            warn!(
                account_id = %account.id(),
                hash_length = stored_hash.len(),
                "stored credential hash is malformed, rejecting login"
            );
            return Err(DomainError::invalid_credentials());
        }

        match self.verify_password(password, stored_hash).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(account_id = %account.id(), "login rejected: password mismatch");
                return Err(DomainError::invalid_credentials());
            }
            Err(e) => {
                error!(account_id = %account.id(), error = %e, "password verification failed");
                return Err(DomainError::invalid_credentials());
            }
        }

        debug!(account_id = %account.id(), "login verified");

        Ok(AuthenticatedAccount::from_account(&account))
    }

    /// Verify on the blocking pool; bcrypt comparison costs as much as
    /// hashing.
    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::hashing(format!("verification task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::INVALID_CREDENTIALS_MESSAGE;
    use crate::domain::account::{MockAccountStore, NewAccount};
    use crate::infrastructure::account::hasher::BcryptHasher;
    use crate::infrastructure::account::provisioning::AccountProvisioningService;

    async fn store_with_alice() -> Arc<MockAccountStore> {
        let store = Arc::new(MockAccountStore::new());
        let service =
            AccountProvisioningService::new(Arc::clone(&store), Arc::new(BcryptHasher::new(4)));

        service
            .signup("alice", "alice@x.com", "Secret123")
            .await
            .unwrap();

        store
    }

    fn auth_service(
        store: Arc<MockAccountStore>,
    ) -> AuthenticationService<MockAccountStore, BcryptHasher> {
        AuthenticationService::new(store, Arc::new(BcryptHasher::new(4)))
    }

    #[tokio::test]
    async fn test_login_success_returns_projection() {
        let store = store_with_alice().await;
        let stored = store.find_by_email("alice@x.com").await.unwrap().unwrap();
        let service = auth_service(store);

        let account = service.login("alice@x.com", "Secret123").await.unwrap();

        assert_eq!(account.id, stored.id());
        assert_eq!(account.email, "alice@x.com");
        assert_eq!(account.username, "alice");
        assert_eq!(account.role, AccountRole::User);
        assert!(account.is_verified);
    }

    #[tokio::test]
    async fn test_login_rejects_missing_input() {
        let service = auth_service(Arc::new(MockAccountStore::new()));

        let missing_email = service.login("", "Secret123").await.unwrap_err();
        let missing_password = service.login("alice@x.com", "").await.unwrap_err();

        assert!(matches!(missing_email, DomainError::Validation { .. }));
        assert!(matches!(missing_password, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_generic() {
        let service = auth_service(store_with_alice().await);

        let error = service.login("alice@x.com", "wrong").await.unwrap_err();

        assert!(matches!(error, DomainError::Authentication { .. }));
        assert!(error.to_string().contains(INVALID_CREDENTIALS_MESSAGE));
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
        let service = auth_service(store_with_alice().await);

        let unknown_email = service
            .login("nobody@x.com", "Secret123")
            .await
            .unwrap_err();
        let wrong_password = service.login("alice@x.com", "wrong").await.unwrap_err();

        assert_eq!(unknown_email.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_stored_hash() {
        let store = Arc::new(MockAccountStore::new());
        // Bypass provisioning to plant a corrupt hash.
        store
            .insert(NewAccount::new("mallory", "mallory@x.com", "not-a-hash"))
            .await
            .unwrap();
        let service = auth_service(Arc::clone(&store));

        let error = service.login("mallory@x.com", "whatever").await.unwrap_err();

        assert!(matches!(error, DomainError::Authentication { .. }));
        assert!(error.to_string().contains(INVALID_CREDENTIALS_MESSAGE));
    }

    #[tokio::test]
    async fn test_login_performs_no_writes() {
        let store = store_with_alice().await;
        let service = auth_service(Arc::clone(&store));

        service.login("alice@x.com", "Secret123").await.unwrap();
        service.login("alice@x.com", "wrong").await.unwrap_err();

        assert_eq!(store.update_calls(), 0);
    }

    #[tokio::test]
    async fn test_login_surfaces_storage_failure() {
        let store = store_with_alice().await;
        store.set_should_fail(true).await;
        let service = auth_service(store);

        let error = service.login("alice@x.com", "Secret123").await.unwrap_err();

        // A dead store is an internal fault, not a credentials problem.
        assert!(matches!(error, DomainError::Storage { .. }));
    }

    #[tokio::test]
    async fn test_signup_then_login_round_trip() {
        let store = Arc::new(MockAccountStore::new());
        let hasher = Arc::new(BcryptHasher::new(4));
        let provisioning =
            AccountProvisioningService::new(Arc::clone(&store), Arc::clone(&hasher));
        let authentication = AuthenticationService::new(Arc::clone(&store), hasher);

        let provisioned = provisioning
            .signup("alice", "alice@x.com", "Secret123")
            .await
            .unwrap();

        let authenticated = authentication
            .login("alice@x.com", "Secret123")
            .await
            .unwrap();
        assert_eq!(authenticated.id, provisioned.id);

        let rejected = authentication.login("alice@x.com", "wrong").await;
        assert!(matches!(
            rejected,
            Err(DomainError::Authentication { .. })
        ));
    }
}
