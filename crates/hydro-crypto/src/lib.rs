//! # Hydro Crypto
//!
//! Cryptographic primitives for the hydro chunked-file system.
//!
//! This crate provides:
//! - **Checksums**: SHA-256 content digests, rendered as base64
//! - **AEAD**: AES-256-GCM payload encryption with per-call random IVs
//! - **Signing**: ed25519 key pairs and detached signatures
//! - **Keyring**: in-memory signer-id to verifying-key lookup
//!
//! The pipeline in `hydro-core` never touches a platform crypto facility
//! directly; this crate is the capability boundary, so a different
//! runtime's crypto library can be substituted behind the same surface
//! without touching pipeline logic.

pub mod aead;
pub mod checksum;
pub mod error;
pub mod keyring;
pub mod keys;

pub use aead::{CipherKey, Iv, CIPHER_KEY_SIZE, IV_SIZE};
pub use checksum::{digest, is_valid, Checksum, IncrementalDigest, DIGEST_BYTE_SIZE};
pub use error::{CryptoError, Result};
pub use keyring::{Keyring, SignerId};
pub use keys::{Signature, SigningKeyPair, VerifyingKey, KEY_SIZE, SIGNATURE_SIZE};
