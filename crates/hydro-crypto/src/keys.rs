//! Signing key management
//!
//! Chunk signatures use ed25519. A `SigningKeyPair` stays with the peer
//! that produced it; only the `VerifyingKey` half is shared (through the
//! keyring) so other peers can verify chunk signatures.

use crate::{CryptoError, Result};
use base64::Engine;
use ed25519_dalek::{Signer, Verifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::ZeroizeOnDrop;

/// Size of an ed25519 key in bytes
pub const KEY_SIZE: usize = 32;

/// Size of an ed25519 signature in bytes
pub const SIGNATURE_SIZE: usize = 64;

/// A detached signature, rendered as base64 on the wire
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap an already-rendered signature string
    pub fn from_base64(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the rendered signature
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn to_dalek(&self) -> Result<ed25519_dalek::Signature> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(&self.0)?;
        ed25519_dalek::Signature::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({})", self.0)
    }
}

/// The public half of a signing key pair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    bytes: [u8; KEY_SIZE],
}

impl VerifyingKey {
    /// Create from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "verifying key must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(bytes);
        // Reject points that are not on the curve up front
        ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self { bytes: arr })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }

    /// Encode as base64
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.bytes)
    }

    /// Decode from base64
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(s)?;
        Self::from_bytes(&bytes)
    }

    /// Verify a detached signature over `message`
    ///
    /// Returns `Ok(false)` on a well-formed but wrong signature; only a
    /// malformed signature or key is an error.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> Result<bool> {
        let key = ed25519_dalek::VerifyingKey::from_bytes(&self.bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let sig = signature.to_dalek()?;
        Ok(key.verify(message, &sig).is_ok())
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({})", self.to_base64())
    }
}

/// An ed25519 signing key pair
#[derive(Clone, ZeroizeOnDrop)]
pub struct SigningKeyPair {
    secret: [u8; KEY_SIZE],
}

impl SigningKeyPair {
    /// Generate a new random key pair
    pub fn generate() -> Self {
        let mut secret = [0u8; KEY_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut secret);
        Self { secret }
    }

    /// Create from raw secret key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "secret key must be {} bytes, got {}",
                KEY_SIZE,
                bytes.len()
            )));
        }
        let mut secret = [0u8; KEY_SIZE];
        secret.copy_from_slice(bytes);
        Ok(Self { secret })
    }

    /// Derive the public verifying key
    pub fn verifying_key(&self) -> VerifyingKey {
        let signing = ed25519_dalek::SigningKey::from_bytes(&self.secret);
        VerifyingKey {
            bytes: signing.verifying_key().to_bytes(),
        }
    }

    /// Sign a message, returning a detached signature
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signing = ed25519_dalek::SigningKey::from_bytes(&self.secret);
        let sig = signing.sign(message);
        Signature(base64::engine::general_purpose::STANDARD.encode(sig.to_bytes()))
    }
}

impl std::fmt::Debug for SigningKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print secret material
        write!(f, "SigningKeyPair({})", self.verifying_key().to_base64())
    }
}
