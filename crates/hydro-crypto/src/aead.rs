//! Authenticated encryption using AES-256-GCM
//!
//! Chunk payloads are encrypted with a symmetric cipher key and a fresh
//! random IV per call. The IV travels with the chunk's encryption
//! details; the key never does.

use crate::{CryptoError, Result};
use aes_gcm::{aead::Aead as AeadTrait, Aes256Gcm, KeyInit};
use base64::Engine;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

/// Size of a symmetric cipher key in bytes (256 bits)
pub const CIPHER_KEY_SIZE: usize = 32;

/// Size of an initialization vector in bytes (96 bits for AES-GCM)
pub const IV_SIZE: usize = 12;

/// A random initialization vector for AEAD encryption
///
/// Generated fresh per encryption call, never reused across calls.
/// Rendered as base64 on the wire, like checksums and signatures.
#[derive(Clone, PartialEq, Eq)]
pub struct Iv {
    bytes: [u8; IV_SIZE],
}

impl Iv {
    /// Generate a random IV
    pub fn generate() -> Self {
        let mut bytes = [0u8; IV_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut bytes);
        Self { bytes }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != IV_SIZE {
            return Err(CryptoError::InvalidIv(format!(
                "iv must be {} bytes, got {}",
                IV_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; IV_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self { bytes: arr })
    }

    /// Get the IV bytes
    pub fn as_bytes(&self) -> &[u8; IV_SIZE] {
        &self.bytes
    }
}

impl Serialize for Iv {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(self.bytes))
    }
}

impl<'de> Deserialize<'de> for Iv {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let rendered = String::deserialize(deserializer)?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&rendered)
            .map_err(serde::de::Error::custom)?;
        Iv::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for Iv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Iv({})",
            base64::engine::general_purpose::STANDARD.encode(self.bytes)
        )
    }
}

/// A symmetric key for chunk payload encryption
#[derive(Clone, ZeroizeOnDrop)]
pub struct CipherKey {
    key: [u8; CIPHER_KEY_SIZE],
}

impl CipherKey {
    /// Generate a new random key
    pub fn generate() -> Self {
        let mut key = [0u8; CIPHER_KEY_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut key);
        Self { key }
    }

    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CIPHER_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "cipher key must be {} bytes, got {}",
                CIPHER_KEY_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; CIPHER_KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; CIPHER_KEY_SIZE] {
        &self.key
    }
}

/// Encrypt a payload with a fresh IV, returning the IV alongside
pub fn encrypt(key: &CipherKey, plaintext: &[u8]) -> Result<(Iv, Vec<u8>)> {
    let iv = Iv::generate();
    let ciphertext = encrypt_with_iv(key, &iv, plaintext)?;
    Ok((iv, ciphertext))
}

/// Encrypt a payload with a caller-supplied IV
pub fn encrypt_with_iv(key: &CipherKey, iv: &Iv, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.key)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    cipher
        .encrypt(aes_gcm::Nonce::from_slice(iv.as_bytes()), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypt a payload with the IV recorded at encryption time
pub fn decrypt(key: &CipherKey, iv: &Iv, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.key)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    cipher
        .decrypt(aes_gcm::Nonce::from_slice(iv.as_bytes()), ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let key = CipherKey::generate();
        let plaintext = b"Hello, World!";

        let (iv, ciphertext) = encrypt(&key, plaintext).unwrap();
        assert_ne!(ciphertext.as_slice(), plaintext.as_slice());

        let decrypted = decrypt(&key, &iv, &ciphertext).unwrap();
        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_fresh_iv_per_call() {
        let key = CipherKey::generate();
        let (iv1, _) = encrypt(&key, b"data").unwrap();
        let (iv2, _) = encrypt(&key, b"data").unwrap();
        assert_ne!(iv1, iv2);
    }

    #[test]
    fn test_wrong_key_fails() {
        let key = CipherKey::generate();
        let other = CipherKey::generate();

        let (iv, ciphertext) = encrypt(&key, b"secret").unwrap();
        assert!(decrypt(&other, &iv, &ciphertext).is_err());
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = CipherKey::generate();
        let (iv, mut ciphertext) = encrypt(&key, b"secret").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(decrypt(&key, &iv, &ciphertext).is_err());
    }

    #[test]
    fn test_iv_length_check() {
        assert!(Iv::from_bytes(&[0u8; 8]).is_err());
        assert!(Iv::from_bytes(&[0u8; IV_SIZE]).is_ok());
    }

    #[test]
    fn test_iv_serializes_as_base64_string() {
        let iv = Iv::generate();
        let json = serde_json::to_value(&iv).unwrap();

        let rendered = json.as_str().expect("iv should render as a string");
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(rendered)
            .unwrap();
        assert_eq!(decoded.as_slice(), iv.as_bytes().as_slice());

        let parsed: Iv = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, iv);
    }

    #[test]
    fn test_iv_rejects_malformed_wire_value() {
        assert!(serde_json::from_str::<Iv>("\"not base64!!\"").is_err());
        // Valid base64 of the wrong length still fails the length check
        let short = base64::engine::general_purpose::STANDARD.encode([0u8; 4]);
        assert!(serde_json::from_str::<Iv>(&format!("\"{short}\"")).is_err());
    }

    #[test]
    fn test_empty_plaintext() {
        let key = CipherKey::generate();
        let (iv, ciphertext) = encrypt(&key, b"").unwrap();
        // GCM still emits an authentication tag
        assert_eq!(ciphertext.len(), 16);
        assert_eq!(decrypt(&key, &iv, &ciphertext).unwrap(), Vec::<u8>::new());
    }
}
