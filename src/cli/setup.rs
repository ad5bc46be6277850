//! `zeptovault init` and `zeptovault reset`: passphrase lifecycle.

use anyhow::{bail, Context, Result};

use zeptovault::config::Config;
use zeptovault::vault::PassphraseFile;

/// Initialize the vault: choose a passphrase and write the default config.
pub(crate) async fn cmd_init() -> Result<()> {
    let passphrase_file = PassphraseFile::new();
    if passphrase_file.exists() {
        bail!(
            "Vault already initialized (passphrase at {}). \
             Run `zeptovault reset --yes` to start over.",
            passphrase_file.path().display()
        );
    }

    let passphrase =
        rpassword::prompt_password("Choose a passphrase: ").context("Failed to read passphrase")?;
    if passphrase.is_empty() {
        bail!("Passphrase must not be empty.");
    }
    let confirm =
        rpassword::prompt_password("Confirm passphrase: ").context("Failed to read passphrase")?;
    if passphrase != confirm {
        bail!("Passphrases do not match.");
    }

    passphrase_file.store(&passphrase)?;
    if !Config::path().exists() {
        Config::default().save()?;
        println!("Wrote default config: {}", Config::path().display());
    }

    println!("Vault initialized.");
    println!("Add a key with: zeptovault key set <provider>");
    Ok(())
}

/// Delete the passphrase and every stored key.
pub(crate) async fn cmd_reset(yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "This deletes the passphrase and every stored API key. \
             Re-run with --yes to confirm."
        );
    }

    let passphrase_file = PassphraseFile::new();
    let config = Config::load().unwrap_or_default();
    let store_path = config.store_path();

    passphrase_file.remove()?;
    if store_path.exists() {
        std::fs::remove_file(&store_path)
            .with_context(|| format!("Failed to remove {}", store_path.display()))?;
    }

    println!("Vault reset: passphrase and stored keys removed.");
    println!("Run `zeptovault init` to set up again.");
    Ok(())
}
