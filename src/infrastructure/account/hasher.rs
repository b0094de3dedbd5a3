//! Credential hashing with bcrypt

use std::fmt::Debug;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Default bcrypt cost factor. Stays at 10 so hashes remain comparable with
/// credentials stored by earlier deployments.
pub const DEFAULT_HASH_COST: u32 = 10;

/// Structural pattern of a stored credential hash: algorithm tag, numeric
/// cost, then the 53-character salt-and-digest payload.
static HASH_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$2[aby]\$\d+\$.{53}$").unwrap());

/// Pure structural check of a credential hash. Never errors and never
/// panics, whatever the input.
pub fn matches_hash_format(hash: &str) -> bool {
    HASH_FORMAT.is_match(hash)
}

/// Trait for one-way credential hashing
pub trait CredentialHasher: Send + Sync + Debug {
    /// Hash a plaintext password. Each call salts independently, so hashing
    /// the same plaintext twice yields two different strings.
    fn hash(&self, plaintext: &str) -> Result<String, DomainError>;

    /// Verify a plaintext against a stored hash. A mismatch is `Ok(false)`;
    /// a hash the primitive cannot parse is an error, not a silent `false`.
    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError>;

    /// Structural validity of a stored hash, checked before verification
    fn is_well_formed(&self, hash: &str) -> bool {
        matches_hash_format(hash)
    }
}

/// Bcrypt implementation of the credential hasher
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_COST)
    }
}

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, DomainError> {
        bcrypt::hash(plaintext, self.cost)
            .map_err(|e| DomainError::hashing(format!("failed to hash password: {}", e)))
    }

    fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, DomainError> {
        bcrypt::verify(plaintext, hash)
            .map_err(|e| DomainError::hashing(format!("failed to verify password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast; the format is the same at any cost.
    fn test_hasher() -> BcryptHasher {
        BcryptHasher::new(4)
    }

    #[test]
    fn test_hash_differs_from_plaintext() {
        let hasher = test_hasher();
        let hash = hasher.hash("Secret123").unwrap();

        assert_ne!(hash, "Secret123");
        assert!(!hash.contains("Secret123"));
    }

    #[test]
    fn test_hash_matches_format() {
        let hasher = test_hasher();
        let hash = hasher.hash("Secret123").unwrap();

        assert_eq!(hash.len(), 60);
        assert!(hash.starts_with("$2"));
        assert!(matches_hash_format(&hash));
        assert!(hasher.is_well_formed(&hash));
    }

    #[test]
    fn test_verify_round_trip() {
        let hasher = test_hasher();
        let hash = hasher.hash("Secret123").unwrap();

        assert!(hasher.verify("Secret123", &hash).unwrap());
        assert!(!hasher.verify("WrongPassword", &hash).unwrap());
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = test_hasher();

        let first = hasher.hash("Secret123").unwrap();
        let second = hasher.hash("Secret123").unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("Secret123", &first).unwrap());
        assert!(hasher.verify("Secret123", &second).unwrap());
    }

    #[test]
    fn test_format_accepts_known_variants() {
        let payload = "a".repeat(53);

        assert!(matches_hash_format(&format!("$2a$10${}", payload)));
        assert!(matches_hash_format(&format!("$2b$04${}", payload)));
        assert!(matches_hash_format(&format!("$2y$12${}", payload)));
    }

    #[test]
    fn test_format_rejects_malformed_input() {
        let payload = "a".repeat(53);

        assert!(!matches_hash_format(""));
        assert!(!matches_hash_format("Secret123"));
        assert!(!matches_hash_format("$2x$10$abc"));
        assert!(!matches_hash_format(&format!("$2c$10${}", payload)));
        // payload one character short
        assert!(!matches_hash_format(&format!("$2b$10${}", "a".repeat(52))));
        // missing cost segment
        assert!(!matches_hash_format(&format!("$2b$${}", payload)));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        let hasher = test_hasher();
        let result = hasher.verify("Secret123", "not-a-bcrypt-hash");

        assert!(matches!(result, Err(DomainError::Hashing { .. })));
    }

    #[test]
    fn test_default_cost() {
        assert_eq!(BcryptHasher::default().cost(), DEFAULT_HASH_COST);
        assert_eq!(DEFAULT_HASH_COST, 10);
    }

    #[test]
    fn test_hash_embeds_configured_cost() {
        let hasher = BcryptHasher::new(6);
        let hash = hasher.hash("Secret123").unwrap();

        assert!(hash.starts_with("$2b$06$"));
    }
}
