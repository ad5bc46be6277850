//! `zeptovault key` subcommands: set, get, rm, ls.

use anyhow::{bail, Context, Result};

use zeptovault::config::Config;
use zeptovault::providers::{self, SUPPORTED_PROVIDERS};
use zeptovault::store::{JsonFileStore, PersistentStore};
use zeptovault::vault::{KeyVault, PassphraseFile};
use zeptovault::VaultError;

/// Key management subcommands.
#[derive(clap::Subcommand, Debug)]
pub enum KeyAction {
    /// Encrypt and store an API key for a provider
    Set {
        /// Provider identifier (e.g. "openai")
        provider: String,
        /// The API key; prompted for with hidden input when omitted
        #[arg(long)]
        key: Option<String>,
    },
    /// Decrypt and print the API key for a provider
    Get {
        /// Provider identifier
        provider: String,
    },
    /// Remove the stored API key for a provider
    Rm {
        /// Provider identifier
        provider: String,
    },
    /// List supported providers and whether a key is stored
    Ls,
}

/// Main entry point for `zeptovault key`.
pub(crate) async fn cmd_key(action: KeyAction) -> Result<()> {
    match action {
        KeyAction::Set { provider, key } => cmd_set(&provider, key).await,
        KeyAction::Get { provider } => cmd_get(&provider).await,
        KeyAction::Rm { provider } => cmd_rm(&provider).await,
        KeyAction::Ls => cmd_ls().await,
    }
}

/// Read the passphrase and unlock the vault over the configured store.
fn open_vault() -> Result<KeyVault<JsonFileStore>> {
    let passphrase = PassphraseFile::new()
        .load()
        .context("Failed to read the passphrase file")?;
    let Some(passphrase) = passphrase else {
        bail!("No passphrase configured. Run `zeptovault init` first.");
    };
    let config = Config::load().context("Failed to load configuration")?;
    let store = JsonFileStore::new(config.store_path());
    Ok(KeyVault::unlock(store, &passphrase))
}

fn supported_list() -> String {
    SUPPORTED_PROVIDERS
        .iter()
        .map(|p| p.name)
        .collect::<Vec<_>>()
        .join(", ")
}

async fn cmd_set(provider: &str, key: Option<String>) -> Result<()> {
    if !providers::is_supported(provider) {
        bail!(
            "Unknown provider '{provider}'. Supported: {}",
            supported_list()
        );
    }
    let api_key = match key {
        Some(k) => k,
        None => rpassword::prompt_password(format!("API key for {provider}: "))
            .context("Failed to read API key")?,
    };
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty.");
    }

    let mut vault = open_vault()?;
    vault.save_key(provider, api_key)?;
    println!("Saved API key for '{provider}'.");
    Ok(())
}

async fn cmd_get(provider: &str) -> Result<()> {
    let vault = open_vault()?;
    match vault.get_key(provider) {
        Ok(Some(key)) => {
            // Bare value on stdout so it can be captured by scripts.
            println!("{}", key.as_str());
            Ok(())
        }
        Ok(None) => bail!("No API key stored for '{provider}'."),
        Err(e @ VaultError::Decryption(_)) => Err(anyhow::Error::new(e).context(
            "Decryption failed: wrong passphrase or corrupted store. \
             Fix the passphrase file, or run `zeptovault reset --yes` and re-add your keys",
        )),
        Err(e) => Err(e.into()),
    }
}

async fn cmd_rm(provider: &str) -> Result<()> {
    let mut vault = open_vault()?;
    if vault.has_key(provider)? {
        vault.delete_key(provider)?;
        println!("Removed API key for '{provider}'.");
    } else {
        println!("No API key stored for '{provider}'.");
    }
    Ok(())
}

/// Listing only needs existence checks, so it never asks for the passphrase.
async fn cmd_ls() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let store = JsonFileStore::new(config.store_path());
    for p in SUPPORTED_PROVIDERS {
        let configured = store.get(p.name)?.is_some();
        println!(
            "  {:<12} {}",
            p.name,
            if configured { "key stored" } else { "-" }
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_list_names_all_providers() {
        let list = supported_list();
        for p in SUPPORTED_PROVIDERS {
            assert!(list.contains(p.name), "missing {}", p.name);
        }
        assert!(list.starts_with("anthropic"));
    }
}
