//! AES-256-CBC encryption with the master key.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use super::key::MasterKey;
use crate::error::{LockNoteError, Result};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Length of the CBC initialization vector in bytes.
pub const IV_LENGTH: usize = 16;

/// Output of one encryption: the IV and the ciphertext, kept separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub iv: [u8; IV_LENGTH],
    pub ciphertext: Vec<u8>,
}

impl Encrypted {
    /// Hex-encode the IV for storage.
    pub fn iv_hex(&self) -> String {
        hex::encode(self.iv)
    }

    /// Hex-encode the ciphertext for storage.
    pub fn ciphertext_hex(&self) -> String {
        hex::encode(&self.ciphertext)
    }
}

/// Stateless encrypt/decrypt over one master key.
#[derive(Debug, Clone)]
pub struct CipherEngine {
    key: MasterKey,
}

impl CipherEngine {
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a freshly generated random IV.
    ///
    /// Encrypting the same plaintext twice yields different IVs and
    /// different ciphertexts.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Encrypted> {
        let mut iv = [0u8; IV_LENGTH];
        super::random_bytes(&mut iv)?;

        let ciphertext = Aes256CbcEnc::new_from_slices(self.key.as_bytes(), &iv)
            .map_err(|e| LockNoteError::Crypto(format!("Failed to create cipher: {}", e)))?
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

        Ok(Encrypted { iv, ciphertext })
    }

    /// Decrypt `ciphertext` with `iv`.
    ///
    /// # Errors
    ///
    /// Returns `LockNoteError::Decryption` if the IV is not 16 bytes or the
    /// padding is invalid (wrong key, corrupted or truncated ciphertext).
    pub fn decrypt(&self, iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        if iv.len() != IV_LENGTH {
            return Err(LockNoteError::Decryption(format!(
                "IV must be {} bytes (got {})",
                IV_LENGTH,
                iv.len()
            )));
        }

        Aes256CbcDec::new_from_slices(self.key.as_bytes(), iv)
            .map_err(|e| LockNoteError::Decryption(format!("Failed to create cipher: {}", e)))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| LockNoteError::Decryption("Invalid padding or ciphertext".to_string()))
    }

    /// Encrypt UTF-8 text and return the hex-encoded `(iv, ciphertext)` pair.
    pub fn seal_text(&self, plaintext: &str) -> Result<(String, String)> {
        let encrypted = self.encrypt(plaintext.as_bytes())?;
        Ok((encrypted.iv_hex(), encrypted.ciphertext_hex()))
    }

    /// Inverse of [`CipherEngine::seal_text`].
    pub fn open_text(&self, iv_hex: &str, ciphertext_hex: &str) -> Result<String> {
        let iv = hex::decode(iv_hex)
            .map_err(|e| LockNoteError::Decryption(format!("IV is not valid hex: {}", e)))?;
        let ciphertext = hex::decode(ciphertext_hex).map_err(|e| {
            LockNoteError::Decryption(format!("Ciphertext is not valid hex: {}", e))
        })?;
        let plaintext = self.decrypt(&iv, &ciphertext)?;
        String::from_utf8(plaintext)
            .map_err(|_| LockNoteError::Decryption("Plaintext is not valid UTF-8".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(byte: u8) -> CipherEngine {
        CipherEngine::new(MasterKey::from_bytes([byte; 32]))
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let engine = engine(1);
        let plaintext = b"secret plan: meet at dawn";

        let encrypted = engine.encrypt(plaintext).unwrap();
        let decrypted = engine.decrypt(&encrypted.iv, &encrypted.ciphertext).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_encryption_is_not_deterministic() {
        let engine = engine(1);
        let first = engine.encrypt(b"same plaintext").unwrap();
        let second = engine.encrypt(b"same plaintext").unwrap();

        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_ciphertext_is_block_padded() {
        let engine = engine(1);
        let encrypted = engine.encrypt(b"").unwrap();
        assert_eq!(encrypted.ciphertext.len(), 16);

        let encrypted = engine.encrypt(&[0x42; 16]).unwrap();
        assert_eq!(encrypted.ciphertext.len(), 32);
    }

    #[test]
    fn test_wrong_key_fails_or_garbles() {
        let plaintext = b"the quick brown fox";
        let encrypted = engine(1).encrypt(plaintext).unwrap();

        // CBC has no authentication tag; a wrong key usually breaks padding
        // and otherwise yields garbage.
        match engine(2).decrypt(&encrypted.iv, &encrypted.ciphertext) {
            Err(err) => assert!(matches!(err, LockNoteError::Decryption(_))),
            Ok(garbage) => assert_ne!(garbage, plaintext),
        }
    }

    #[test]
    fn test_truncated_iv_rejected() {
        let engine = engine(1);
        let encrypted = engine.encrypt(b"data").unwrap();
        let result = engine.decrypt(&encrypted.iv[..8], &encrypted.ciphertext);
        assert!(matches!(result, Err(LockNoteError::Decryption(_))));
    }

    #[test]
    fn test_truncated_ciphertext_rejected() {
        let engine = engine(1);
        let encrypted = engine.encrypt(b"some longer plaintext value").unwrap();
        let truncated = &encrypted.ciphertext[..encrypted.ciphertext.len() - 3];
        let result = engine.decrypt(&encrypted.iv, truncated);
        assert!(matches!(result, Err(LockNoteError::Decryption(_))));
    }

    #[test]
    fn test_text_round_trip_through_hex() {
        let engine = engine(9);
        let (iv_hex, ciphertext_hex) = engine.seal_text("héllo wörld ✓").unwrap();

        assert_eq!(iv_hex.len(), 32);
        assert!(iv_hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(engine.open_text(&iv_hex, &ciphertext_hex).unwrap(), "héllo wörld ✓");
    }

    #[test]
    fn test_open_text_rejects_bad_hex() {
        let engine = engine(9);
        let result = engine.open_text("zz", "00");
        assert!(matches!(result, Err(LockNoteError::Decryption(_))));
    }
}
