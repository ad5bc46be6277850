//! Encrypted credential vault.
//!
//! Provider API keys are encrypted under a passphrase-derived key and written
//! to a pluggable [`PersistentStore`], one record per provider. The vault is
//! unlocked once per session: [`KeyVault::unlock`] runs the expensive key
//! derivation a single time and keeps the derived key for the lifetime of the
//! value, and [`KeyVault::lock`] (or drop) discards it.
//!
//! A record that fails authentication on read surfaces as
//! [`VaultError::Decryption`], never as garbage plaintext.

pub mod crypto;
pub mod passphrase;

pub use crypto::{EncryptedRecord, PassphraseCipher, KDF_ITERATIONS, KEY_LEN, NONCE_LEN};
pub use passphrase::PassphraseFile;

use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};
use crate::store::PersistentStore;

/// Credential vault over a persistent store.
///
/// Holding a `KeyVault` means the vault is unlocked. The store is keyed by
/// provider name; values are JSON-serialized [`EncryptedRecord`]s.
pub struct KeyVault<S: PersistentStore> {
    store: S,
    cipher: PassphraseCipher,
}

impl<S: PersistentStore> KeyVault<S> {
    /// Unlock the vault by deriving the key from `passphrase`.
    ///
    /// This runs the full PBKDF2 derivation and is the expensive entry point;
    /// call it once and reuse the vault for the session.
    pub fn unlock(store: S, passphrase: &str) -> Self {
        Self {
            store,
            cipher: PassphraseCipher::derive(passphrase),
        }
    }

    /// Unlock with an already-built cipher (raw key material, tests).
    pub fn with_cipher(store: S, cipher: PassphraseCipher) -> Self {
        Self { store, cipher }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Encrypt `api_key` and persist it under `provider`, overwriting any
    /// existing record. A fresh nonce is generated on every call.
    pub fn save_key(&mut self, provider: &str, api_key: &str) -> Result<()> {
        let record = self.cipher.encrypt(api_key.as_bytes())?;
        let serialized = serde_json::to_string(&record)
            .map_err(|e| VaultError::Storage(format!("cannot serialize credential record: {}", e)))?;
        self.store.set(provider, &serialized)?;
        debug!(provider, "credential saved");
        Ok(())
    }

    /// Decrypt and return the key for `provider`, or `None` when no record
    /// exists.
    ///
    /// A record that cannot be parsed or fails authentication yields
    /// [`VaultError::Decryption`]; treat that as "wrong passphrase or
    /// corrupted store".
    pub fn get_key(&self, provider: &str) -> Result<Option<Zeroizing<String>>> {
        let Some(serialized) = self.store.get(provider)? else {
            return Ok(None);
        };
        let record: EncryptedRecord = serde_json::from_str(&serialized).map_err(|e| {
            VaultError::Decryption(format!("credential record for '{}' is corrupt: {}", provider, e))
        })?;
        let plaintext = self.cipher.decrypt(&record)?;
        let api_key = String::from_utf8(plaintext.to_vec()).map_err(|_| {
            VaultError::Decryption(format!(
                "decrypted payload for '{}' is not valid UTF-8",
                provider
            ))
        })?;
        Ok(Some(Zeroizing::new(api_key)))
    }

    /// Whether a record exists for `provider`. Never decrypts, so it answers
    /// the same regardless of passphrase.
    pub fn has_key(&self, provider: &str) -> Result<bool> {
        Ok(self.store.get(provider)?.is_some())
    }

    /// Remove the record for `provider` if present. Succeeds when absent.
    pub fn delete_key(&mut self, provider: &str) -> Result<()> {
        self.store.remove(provider)?;
        debug!(provider, "credential deleted");
        Ok(())
    }

    /// Lock the vault: drop the derived key (zeroized) and hand the store
    /// back to the caller.
    pub fn lock(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn raw_vault() -> KeyVault<MemoryStore> {
        KeyVault::with_cipher(
            MemoryStore::new(),
            PassphraseCipher::from_raw_key(&[0x42u8; KEY_LEN]),
        )
    }

    #[test]
    fn test_save_then_get_roundtrips() {
        let mut vault = raw_vault();
        vault.save_key("anthropic", "sk-ant-abc123").unwrap();
        let key = vault.get_key("anthropic").unwrap().unwrap();
        assert_eq!(key.as_str(), "sk-ant-abc123");
    }

    #[test]
    fn test_full_provider_lifecycle() {
        let mut vault = raw_vault();
        vault.save_key("openai", "sk-test-123").unwrap();
        assert!(vault.has_key("openai").unwrap());
        assert_eq!(
            vault.get_key("openai").unwrap().unwrap().as_str(),
            "sk-test-123"
        );
        vault.delete_key("openai").unwrap();
        assert!(!vault.has_key("openai").unwrap());
        assert!(vault.get_key("openai").unwrap().is_none());
    }

    #[test]
    fn test_missing_provider_reads_as_none() {
        let vault = raw_vault();
        assert!(vault.get_key("groq").unwrap().is_none());
        assert!(!vault.has_key("groq").unwrap());
    }

    #[test]
    fn test_wrong_passphrase_is_a_decryption_error() {
        let mut vault = KeyVault::unlock(MemoryStore::new(), "correct horse");
        vault.save_key("openai", "sk-test-123").unwrap();
        let store = vault.lock();

        let vault = KeyVault::unlock(store, "battery staple");
        let err = vault.get_key("openai").unwrap_err();
        assert!(matches!(err, VaultError::Decryption(_)), "got {err:?}");
        // Existence checks still work without the right passphrase.
        assert!(vault.has_key("openai").unwrap());
    }

    #[test]
    fn test_overwrite_rotates_the_nonce() {
        let mut vault = raw_vault();
        vault.save_key("openai", "sk-test-123").unwrap();
        let first: EncryptedRecord =
            serde_json::from_str(&vault.store().get("openai").unwrap().unwrap()).unwrap();
        vault.save_key("openai", "sk-test-123").unwrap();
        let second: EncryptedRecord =
            serde_json::from_str(&vault.store().get("openai").unwrap().unwrap()).unwrap();
        assert_ne!(first.iv, second.iv);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut vault = raw_vault();
        vault.delete_key("never-saved").unwrap();
        vault.save_key("openai", "sk").unwrap();
        vault.delete_key("openai").unwrap();
        vault.delete_key("openai").unwrap();
        assert!(!vault.has_key("openai").unwrap());
    }

    #[test]
    fn test_corrupt_record_is_a_decryption_error() {
        let mut store = MemoryStore::new();
        store.set("openai", "not a credential record").unwrap();
        let vault = KeyVault::with_cipher(store, PassphraseCipher::from_raw_key(&[7u8; KEY_LEN]));
        assert!(matches!(
            vault.get_key("openai"),
            Err(VaultError::Decryption(_))
        ));
    }

    #[test]
    fn test_stored_record_is_iv_and_ciphertext_byte_arrays() {
        let mut vault = raw_vault();
        vault.save_key("gemini", "AIza-test").unwrap();
        let raw = vault.store().get("gemini").unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["iv"].as_array().unwrap().len(), NONCE_LEN);
        assert!(value["ciphertext"].as_array().unwrap().len() > b"AIza-test".len());
    }
}
