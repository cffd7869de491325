//! In-memory signer-id to verifying-key lookup
//!
//! Lets signature verification resolve keys by signer id instead of the
//! caller threading keys through every call. Nothing here is persisted;
//! durable key storage is a collaborator concern.

use crate::keys::VerifyingKey;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;

/// Identifier of the peer that produced a signature
pub type SignerId = Uuid;

/// An in-memory map from signer id to verifying key
#[derive(Default)]
pub struct Keyring {
    keys: RwLock<HashMap<SignerId, VerifyingKey>>,
}

impl Keyring {
    /// Create an empty keyring
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key for a signer
    ///
    /// An existing entry for the same signer is overwritten; that is
    /// surfaced as a warning, not an error.
    pub fn add(&self, signer_id: SignerId, key: VerifyingKey) {
        let mut keys = self.keys.write();
        if keys.contains_key(&signer_id) {
            tracing::warn!(%signer_id, "overwriting existing keyring entry");
        }
        keys.insert(signer_id, key);
    }

    /// Look up the key for a signer
    pub fn get(&self, signer_id: &SignerId) -> Option<VerifyingKey> {
        self.keys.read().get(signer_id).cloned()
    }

    /// Remove the key for a signer
    pub fn remove(&self, signer_id: &SignerId) {
        self.keys.write().remove(signer_id);
    }

    /// Number of registered signers
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Check if the keyring has no entries
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::SigningKeyPair;

    #[test]
    fn test_add_get_remove() {
        let keyring = Keyring::new();
        let signer_id = Uuid::new_v4();
        let key = SigningKeyPair::generate().verifying_key();

        assert!(keyring.get(&signer_id).is_none());

        keyring.add(signer_id, key.clone());
        assert_eq!(keyring.get(&signer_id), Some(key));
        assert_eq!(keyring.len(), 1);

        keyring.remove(&signer_id);
        assert!(keyring.get(&signer_id).is_none());
        assert!(keyring.is_empty());
    }

    #[test_log::test]
    fn test_add_overwrites_existing_entry() {
        let keyring = Keyring::new();
        let signer_id = Uuid::new_v4();
        let first = SigningKeyPair::generate().verifying_key();
        let second = SigningKeyPair::generate().verifying_key();

        keyring.add(signer_id, first);
        keyring.add(signer_id, second.clone());

        assert_eq!(keyring.len(), 1);
        assert_eq!(keyring.get(&signer_id), Some(second));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let keyring = Keyring::new();
        keyring.remove(&Uuid::new_v4());
        assert!(keyring.is_empty());
    }
}
