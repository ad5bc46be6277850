//! `zeptovault status`: paths, vault state, providers, cache settings.

use anyhow::{Context, Result};

use zeptovault::config::Config;
use zeptovault::providers::{self, SUPPORTED_PROVIDERS};
use zeptovault::store::{JsonFileStore, PersistentStore};
use zeptovault::vault::PassphraseFile;

/// Print a full status report. Never asks for the passphrase; everything
/// shown is derivable from file presence and the config.
pub(crate) async fn cmd_status() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;
    let passphrase = PassphraseFile::new();
    let store_path = config.store_path();
    let store = JsonFileStore::new(store_path.clone());

    println!("ZeptoVault Status");
    println!();

    println!("Paths:");
    println!("  Data directory:   {:?}", Config::dir());
    println!(
        "  Config file:      {:?} (exists: {})",
        Config::path(),
        Config::path().exists()
    );
    println!(
        "  Key store:        {:?} (exists: {})",
        store_path,
        store.exists()
    );
    println!();

    println!("Vault:");
    if passphrase.exists() {
        println!("  Passphrase configured: yes");
    } else {
        println!("  Passphrase configured: no (run `zeptovault init`)");
    }
    let stored = SUPPORTED_PROVIDERS
        .iter()
        .filter(|p| matches!(store.get(p.name), Ok(Some(_))))
        .count();
    println!("  Stored keys:           {stored}");
    println!();

    println!("Providers:");
    for p in SUPPORTED_PROVIDERS {
        let configured = matches!(store.get(p.name), Ok(Some(_)));
        println!(
            "  {:<12} {:<12} {}",
            p.display_name,
            if configured { "key stored" } else { "-" },
            p.default_model
        );
    }
    println!();

    println!("Cache:");
    println!("  Enabled:      {}", config.cache.enabled);
    println!("  TTL:          {}s", config.cache.ttl_secs);
    println!("  Capacity:     {} entries", config.cache.max_entries);
    println!();

    println!("Chat defaults:");
    println!("  Provider:     {}", config.chat.provider);
    let model = config
        .chat
        .model
        .clone()
        .or_else(|| providers::default_model(&config.chat.provider).map(String::from));
    match model {
        Some(m) => println!("  Model:        {m}"),
        None => println!(
            "  Model:        - (unknown provider '{}')",
            config.chat.provider
        ),
    }
    Ok(())
}
