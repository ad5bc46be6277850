//! Configuration loading: `~/.zeptovault/config.json` plus env overrides.
//!
//! Every field has a default, so a missing config file is not an error and a
//! partial file only overrides what it names. `ZEPTOVAULT_*` environment
//! variables are applied on top of whatever the file provides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::error::{Result, VaultError};

const CONFIG_FILE: &str = "config.json";
const STORE_FILE: &str = "keys.json";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub vault: VaultConfig,
    pub cache: CacheConfig,
    pub chat: ChatConfig,
}

/// Credential store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Override for the encrypted store file. Defaults to `<dir>/keys.json`.
    pub store_path: Option<PathBuf>,
}

/// Response cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether prompt responses are cached at all.
    pub enabled: bool,
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,
    /// Maximum number of cached entries.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: DEFAULT_TTL_SECS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Chat defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Provider used when none is specified.
    pub provider: String,
    /// Model override; `None` means the provider's default model.
    pub model: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: None,
        }
    }
}

impl Config {
    /// Data directory: `$ZEPTOVAULT_DIR` if set, else `~/.zeptovault`.
    pub fn dir() -> PathBuf {
        if let Ok(dir) = std::env::var("ZEPTOVAULT_DIR") {
            if !dir.is_empty() {
                return PathBuf::from(dir);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".zeptovault")
    }

    /// Path of the config file.
    pub fn path() -> PathBuf {
        Self::dir().join(CONFIG_FILE)
    }

    /// Path of the encrypted credential store, honoring the config override.
    pub fn store_path(&self) -> PathBuf {
        self.vault
            .store_path
            .clone()
            .unwrap_or_else(|| Self::dir().join(STORE_FILE))
    }

    /// Load from the default path and apply env overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_path(&Self::path())?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields the defaults; a
    /// file that exists but does not parse is an error.
    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)
            .map_err(|e| VaultError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| VaultError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    /// Write the config to the default path as pretty JSON.
    pub fn save(&self) -> Result<()> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                VaultError::Storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| VaultError::Config(format!("cannot serialize config: {}", e)))?;
        std::fs::write(&path, data)
            .map_err(|e| VaultError::Storage(format!("cannot write {}: {}", path.display(), e)))?;
        Ok(())
    }

    /// Apply `ZEPTOVAULT_*` env overrides on top of the loaded values.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Override fields from a variable lookup. Unparseable values are
    /// ignored with a warning rather than failing startup.
    fn apply_overrides_from(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("ZEPTOVAULT_CACHE_ENABLED") {
            match v.parse::<bool>() {
                Ok(b) => self.cache.enabled = b,
                Err(_) => warn!(value = %v, "ignoring invalid ZEPTOVAULT_CACHE_ENABLED"),
            }
        }
        if let Some(v) = get("ZEPTOVAULT_CACHE_TTL_SECS") {
            match v.parse::<u64>() {
                Ok(n) => self.cache.ttl_secs = n,
                Err(_) => warn!(value = %v, "ignoring invalid ZEPTOVAULT_CACHE_TTL_SECS"),
            }
        }
        if let Some(v) = get("ZEPTOVAULT_CACHE_MAX_ENTRIES") {
            match v.parse::<usize>() {
                Ok(n) => self.cache.max_entries = n,
                Err(_) => warn!(value = %v, "ignoring invalid ZEPTOVAULT_CACHE_MAX_ENTRIES"),
            }
        }
        if let Some(v) = get("ZEPTOVAULT_CHAT_PROVIDER") {
            if !v.is_empty() {
                self.chat.provider = v;
            }
        }
        if let Some(v) = get("ZEPTOVAULT_CHAT_MODEL") {
            if !v.is_empty() {
                self.chat.model = Some(v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_cache_config_defaults() {
        let cfg = CacheConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.ttl_secs, 1800);
        assert_eq!(cfg.max_entries, 100);
    }

    #[test]
    fn test_chat_config_defaults() {
        let cfg = ChatConfig::default();
        assert_eq!(cfg.provider, "anthropic");
        assert!(cfg.model.is_none());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::load_from_path(&tmp.path().join("config.json")).unwrap();
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.cache.ttl_secs, 1800);
    }

    #[test]
    fn test_partial_file_only_overrides_named_fields() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"cache": {"ttl_secs": 60}}"#).unwrap();
        let cfg = Config::load_from_path(&path).unwrap();
        assert_eq!(cfg.cache.ttl_secs, 60);
        assert_eq!(cfg.cache.max_entries, 100, "unnamed fields keep defaults");
        assert_eq!(cfg.chat.provider, "anthropic");
    }

    #[test]
    fn test_corrupt_file_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, VaultError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_env_overrides_apply() {
        let vars: HashMap<&str, &str> = [
            ("ZEPTOVAULT_CACHE_ENABLED", "false"),
            ("ZEPTOVAULT_CACHE_TTL_SECS", "90"),
            ("ZEPTOVAULT_CACHE_MAX_ENTRIES", "7"),
            ("ZEPTOVAULT_CHAT_PROVIDER", "groq"),
            ("ZEPTOVAULT_CHAT_MODEL", "llama-3.3-70b-versatile"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()));
        assert!(!cfg.cache.enabled);
        assert_eq!(cfg.cache.ttl_secs, 90);
        assert_eq!(cfg.cache.max_entries, 7);
        assert_eq!(cfg.chat.provider, "groq");
        assert_eq!(cfg.chat.model.as_deref(), Some("llama-3.3-70b-versatile"));
    }

    #[test]
    fn test_invalid_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.apply_overrides_from(|name| {
            (name == "ZEPTOVAULT_CACHE_TTL_SECS").then(|| "not-a-number".to_string())
        });
        assert_eq!(cfg.cache.ttl_secs, 1800, "bad value must leave the default");
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let mut cfg = Config::default();
        cfg.cache.ttl_secs = 42;
        cfg.chat.provider = "openai".into();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cache.ttl_secs, 42);
        assert_eq!(back.chat.provider, "openai");
    }
}
