//! Cryptographic operations for LockNote.
//!
//! - **MasterKey**: one application-wide 256-bit key from the deployment secret
//! - **CipherEngine**: AES-256-CBC with a fresh random IV per encryption
//! - **PasswordHasher**: salted Argon2id hashes in PHC string form
//!
//! ## Security Model
//!
//! The password gates access through a separate hash check; it does not
//! derive the decryption key. Anyone holding the master key and a note's
//! ciphertext can decrypt it without the password.
//!
//! Plaintext, passwords and key material are never logged.

pub mod cipher;
pub mod key;
pub mod password;

pub use cipher::{CipherEngine, Encrypted};
pub use key::{MasterKey, KEY_LENGTH, SECRET_KEY_ENV};
pub use password::{normalize_password, PasswordHasher};

/// Fill `buf` from the operating system's CSPRNG.
pub(crate) fn random_bytes(buf: &mut [u8]) -> crate::error::Result<()> {
    getrandom::getrandom(buf)
        .map_err(|e| crate::error::LockNoteError::Crypto(format!("Random source failed: {}", e)))
}
