//! Passphrase-derived authenticated encryption for API keys at rest.
//!
//! A 256-bit key is derived from the passphrase with PBKDF2-HMAC-SHA256 and
//! used with ChaCha20-Poly1305. The AEAD tag gives tamper detection: a record
//! decrypted with the wrong passphrase or modified on disk fails
//! authentication instead of yielding garbage plaintext.
//!
//! # Security notes
//!
//! - The nonce is regenerated from the OS CSPRNG on **every** encryption call
//!   and stored alongside the ciphertext; a stored nonce is never reused for a
//!   new encryption.
//! - The derived key lives in memory for the lifetime of the cipher value and
//!   is zeroized on drop.
//! - This protects against casual disclosure of the persisted store, not
//!   against an attacker who can read the passphrase file on the same device.

use std::num::NonZeroU32;

use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use ring::pbkdf2;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::error::{Result, VaultError};

/// PBKDF2 round count for passphrase key derivation.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Fixed KDF salt. Key derivation is deterministic per passphrase, so records
/// are portable across installs; replacing this with a per-install salt
/// invalidates every stored record (a storage-format change).
const KDF_SALT: &[u8] = b"salt";

/// Derived key length in bytes (256-bit key).
pub const KEY_LEN: usize = 32;

/// Nonce length in bytes (96-bit AEAD nonce).
pub const NONCE_LEN: usize = 12;

/// An encrypted credential as persisted: the per-encryption nonce and the
/// authenticated ciphertext, each serialized as a JSON array of byte values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedRecord {
    /// Random 96-bit nonce generated for this encryption.
    pub iv: Vec<u8>,
    /// ChaCha20-Poly1305 ciphertext (includes the authentication tag).
    pub ciphertext: Vec<u8>,
}

/// Symmetric cipher bound to one derived key.
///
/// Derive it once per unlocked session and drop (or [`KeyVault::lock`]) to
/// discard the key material.
///
/// [`KeyVault::lock`]: crate::vault::KeyVault::lock
pub struct PassphraseCipher {
    key: Zeroizing<[u8; KEY_LEN]>,
}

impl PassphraseCipher {
    /// Derive the symmetric key from `passphrase` (PBKDF2-HMAC-SHA256,
    /// [`KDF_ITERATIONS`] rounds).
    pub fn derive(passphrase: &str) -> Self {
        let iterations = NonZeroU32::new(KDF_ITERATIONS).expect("iteration count is non-zero");
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::derive(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            KDF_SALT,
            passphrase.as_bytes(),
            key.as_mut_slice(),
        );
        Self { key }
    }

    /// Build a cipher from raw key bytes, skipping derivation.
    pub fn from_raw_key(key: &[u8; KEY_LEN]) -> Self {
        Self {
            key: Zeroizing::new(*key),
        }
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<EncryptedRecord> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(self.key.as_slice()));
        let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| VaultError::Encryption(format!("AEAD encryption failed: {}", e)))?;
        Ok(EncryptedRecord {
            iv: nonce.to_vec(),
            ciphertext,
        })
    }

    /// Decrypt a record, authenticating it in the process.
    ///
    /// Fails with [`VaultError::Decryption`] when the nonce has the wrong
    /// length or the AEAD tag does not verify (wrong passphrase, corrupted
    /// record, or tampered ciphertext).
    pub fn decrypt(&self, record: &EncryptedRecord) -> Result<Zeroizing<Vec<u8>>> {
        if record.iv.len() != NONCE_LEN {
            return Err(VaultError::Decryption(format!(
                "invalid nonce length: expected {} bytes, found {}",
                NONCE_LEN,
                record.iv.len()
            )));
        }
        let cipher = ChaCha20Poly1305::new(Key::from_slice(self.key.as_slice()));
        let plaintext = cipher
            .decrypt(Nonce::from_slice(&record.iv), record.ciphertext.as_slice())
            .map_err(|_| {
                VaultError::Decryption(
                    "authentication failed: wrong passphrase or corrupted record".to_string(),
                )
            })?;
        Ok(Zeroizing::new(plaintext))
    }
}
