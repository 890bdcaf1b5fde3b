//! Password hashing with Argon2id.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...`) that embed their own
//! random salt and cost parameters.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::{LockNoteError, Result};

/// Argon2id cost used for new hashes.
///
/// - Memory: 19 MiB (19 * 1024 KiB)
/// - Iterations: 2
/// - Parallelism: 1
const ARGON2_MEMORY_KB: u32 = 19 * 1024;
const ARGON2_ITERATIONS: u32 = 2;
const ARGON2_PARALLELISM: u32 = 1;

/// Salt length in bytes.
const SALT_LENGTH: usize = 16;

/// Salted, adaptive one-way password hashing.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Hasher with the production cost.
    pub fn new() -> Result<Self> {
        Self::with_cost(ARGON2_MEMORY_KB, ARGON2_ITERATIONS)
    }

    /// Hasher with a custom memory (KiB) and iteration cost.
    pub fn with_cost(memory_kb: u32, iterations: u32) -> Result<Self> {
        let params = Params::new(memory_kb, iterations, ARGON2_PARALLELISM, None)
            .map_err(|e| LockNoteError::Crypto(format!("Failed to create Argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `password` with a fresh random salt.
    ///
    /// Hashing the same password twice yields different strings.
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt_bytes = [0u8; SALT_LENGTH];
        super::random_bytes(&mut salt_bytes)?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| LockNoteError::Crypto(format!("Failed to encode salt: {}", e)))?;

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| LockNoteError::Crypto(format!("Password hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check `password` against a stored PHC hash.
    ///
    /// A malformed or empty stored hash never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(_) => return false,
        };
        // Parameters come from the PHC string, not from `self`.
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Treat an absent or whitespace-only password as "no password supplied".
pub fn normalize_password(password: Option<&str>) -> Option<&str> {
    password.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> PasswordHasher {
        PasswordHasher::with_cost(64, 1).unwrap()
    }

    #[test]
    fn test_hash_then_verify() {
        let hasher = fast();
        let hash = hasher.hash("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("pw1", &hash));
        assert!(!hasher.verify("pw2", &hash));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hasher = fast();
        let first = hasher.hash("same").unwrap();
        let second = hasher.hash("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hash_does_not_match() {
        let hasher = fast();
        assert!(!hasher.verify("pw", ""));
        assert!(!hasher.verify("pw", "not-a-phc-string"));
        assert!(!hasher.verify("pw", "$argon2id$v=19$garbage"));
    }

    #[test]
    fn test_verify_uses_embedded_params() {
        let cheap = fast();
        let hash = cheap.hash("portable").unwrap();
        let other = PasswordHasher::with_cost(128, 2).unwrap();
        assert!(other.verify("portable", &hash));
    }

    #[test]
    fn test_production_cost_is_valid() {
        assert!(PasswordHasher::new().is_ok());
    }

    #[test]
    fn test_normalize_password() {
        assert_eq!(normalize_password(Some("pw")), Some("pw"));
        assert_eq!(normalize_password(Some("  ")), None);
        assert_eq!(normalize_password(Some("")), None);
        assert_eq!(normalize_password(None), None);
    }
}
