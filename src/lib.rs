//! ZeptoVault -- encrypted credential vault and response cache for LLM tools.
//!
//! The crate has two cooperating cores and the session glue around them:
//!
//! - [`vault`]: provider API keys encrypted at rest under a passphrase-derived
//!   key (PBKDF2-HMAC-SHA256 + ChaCha20-Poly1305), stored in a pluggable
//!   [`store::PersistentStore`].
//! - [`cache`]: an in-memory response cache keyed by a
//!   `(provider, model, prompt)` fingerprint, with TTL expiry and FIFO
//!   eviction.
//! - [`session`]: a chat session that consults the cache before calling the
//!   injected [`providers::ChatBackend`].
//!
//! # Example
//!
//! ```rust
//! use zeptovault::store::MemoryStore;
//! use zeptovault::vault::KeyVault;
//!
//! let mut vault = KeyVault::unlock(MemoryStore::new(), "correct horse");
//! vault.save_key("openai", "sk-test-123")?;
//! assert_eq!(vault.get_key("openai")?.unwrap().as_str(), "sk-test-123");
//!
//! vault.delete_key("openai")?;
//! assert!(!vault.has_key("openai")?);
//! # Ok::<(), zeptovault::error::VaultError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod providers;
pub mod session;
pub mod store;
pub mod vault;

pub use cache::ResponseCache;
pub use config::Config;
pub use error::{Result, VaultError};
pub use session::ChatSession;
pub use vault::{KeyVault, PassphraseFile};
