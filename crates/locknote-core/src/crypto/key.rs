//! Application master key.
//!
//! The key is supplied by the deployment as a base64 string and must decode
//! to exactly 32 bytes. There is no derivation, rotation or per-note key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{LockNoteError, Result};

/// Length of the master key in bytes (AES-256).
pub const KEY_LENGTH: usize = 32;

/// Environment variable holding the base64 master key.
pub const SECRET_KEY_ENV: &str = "LOCKNOTE_SECRET_KEY";

/// The process-wide symmetric key.
///
/// Key bytes are zeroized when dropped.
#[derive(Clone, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Decode a base64 deployment secret.
    ///
    /// # Errors
    ///
    /// Returns `LockNoteError::Configuration` if the value is not valid
    /// base64 or does not decode to exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let decoded = Zeroizing::new(STANDARD.decode(encoded.trim()).map_err(|e| {
            LockNoteError::Configuration(format!("{} is not valid base64: {}", SECRET_KEY_ENV, e))
        })?);

        let key: [u8; KEY_LENGTH] = decoded.as_slice().try_into().map_err(|_| {
            LockNoteError::Configuration(format!(
                "{} must be a 32-byte base64 string (AES-256). Got {} bytes.",
                SECRET_KEY_ENV,
                decoded.len()
            ))
        })?;

        Ok(Self::from_bytes(key))
    }

    /// Read and decode the key from the environment variable `var`.
    ///
    /// An absent variable is treated like an empty secret (0 bytes).
    pub fn from_env(var: &str) -> Result<Self> {
        let value = Zeroizing::new(std::env::var(var).unwrap_or_default());
        Self::from_base64(&value)
    }

    /// Generate a fresh random key.
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LENGTH];
        super::random_bytes(&mut key)?;
        Ok(Self::from_bytes(key))
    }

    /// Encode the key as the base64 form accepted by [`MasterKey::from_base64`].
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(self.key))
    }

    /// Avoid storing or logging this value.
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_base64_accepts_32_bytes() {
        let encoded = STANDARD.encode([7u8; 32]);
        let key = MasterKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &[7u8; 32]);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let encoded = STANDARD.encode([1u8; 16]);
        let err = MasterKey::from_base64(&encoded).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Got 16 bytes"));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = MasterKey::from_base64("").unwrap_err();
        assert!(matches!(err, LockNoteError::Configuration(_)));
        assert!(err.to_string().contains("Got 0 bytes"));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = MasterKey::from_base64("not base64 !!").unwrap_err();
        assert!(matches!(err, LockNoteError::Configuration(_)));
    }

    #[test]
    fn test_missing_env_var_rejected() {
        let result = MasterKey::from_env("LOCKNOTE_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(LockNoteError::Configuration(_))));
    }

    #[test]
    fn test_generate_round_trips_through_base64() {
        let key = MasterKey::generate().unwrap();
        let decoded = MasterKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key.as_bytes(), decoded.as_bytes());
    }

    #[test]
    fn test_debug_redacts() {
        let key = MasterKey::from_bytes([0xAB; 32]);
        let debug_output = format!("{:?}", key);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("ab"));
        assert!(!debug_output.contains("171"));
    }
}
