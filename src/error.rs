//! Crate-wide error type and result alias.
//!
//! The vault never swallows a cryptographic failure: every operation wraps the
//! underlying cause in a typed variant so callers can distinguish "wrong
//! passphrase or corrupted store" (`Decryption`) from a failing backing store
//! (`Storage`) and react accordingly. The cache never raises -- it fails
//! closed and treats any inconsistency as a miss.

use thiserror::Error;

/// All errors surfaced by the zeptovault library.
#[derive(Debug, Error)]
pub enum VaultError {
    /// The cipher call failed while saving a key (e.g. invalid key material).
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// Authentication failed while reading a key: wrong passphrase, corrupted
    /// record, or tampered ciphertext. Callers should offer passphrase
    /// re-entry or a vault reset, never fall back to an empty key.
    #[error("Decryption failed: {0}")]
    Decryption(String),

    /// The persistent key-value store could not be read or written.
    #[error("Storage failure: {0}")]
    Storage(String),

    /// Configuration could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A chat backend call failed.
    #[error("Provider error: {0}")]
    Provider(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VaultError>;
