//! `zeptovault` binary: manage the encrypted API key vault from the shell.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "zeptovault",
    version,
    about = "Encrypted API key vault with response caching for LLM tools"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the vault: choose a passphrase and write the default config
    Init,
    /// Manage stored API keys
    Key {
        #[command(subcommand)]
        action: cli::keys::KeyAction,
    },
    /// Show vault, provider, and cache status
    Status,
    /// Delete the passphrase and all stored keys
    Reset {
        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

/// `RUST_LOG` controls the filter; `ZEPTOVAULT_LOG_FORMAT=json` switches to
/// structured output for log collectors.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("zeptovault=warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if std::env::var("ZEPTOVAULT_LOG_FORMAT").as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    match args.command {
        Commands::Init => cli::setup::cmd_init().await,
        Commands::Key { action } => cli::keys::cmd_key(action).await,
        Commands::Status => cli::status::cmd_status().await,
        Commands::Reset { yes } => cli::setup::cmd_reset(yes).await,
    }
}
