//! Agent toolkit bootstrapper CLI
//!
//! Command-line interface for preparing the agent wallet.

use agentkit_bootstrap::{
    ActionProvider, BootstrapConfig, FileRecordStore, RecordStore, Result, RpcConfig,
    WalletActionProvider, WalletBootstrapper,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "agentkit-prepare")]
#[command(about = "Prepare the agent wallet provider and toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the wallet record (overrides WALLET_DATA_FILE)
    #[arg(short, long, global = true)]
    wallet_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the key, configure the wallet provider and save the wallet record
    Prepare {
        /// Register the built-in wallet actions on the toolkit
        #[arg(long)]
        wallet_actions: bool,
    },

    /// Show the stored smart wallet address
    Show,

    /// Show current configuration (secrets redacted)
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let (text, json) = if cli.json {
        (None, Some(fmt::layer().json()))
    } else {
        (Some(fmt::layer()), None)
    };
    tracing_subscriber::registry()
        .with(text)
        .with(json)
        .with(filter)
        .init();

    match cli.command {
        Commands::Prepare { wallet_actions } => {
            let config = load_config(cli.wallet_file)?;
            run_prepare(config, wallet_actions).await?;
        }
        Commands::Show => {
            let path = cli
                .wallet_file
                .unwrap_or_else(agentkit_bootstrap::config::wallet_data_path_from_env);
            run_show(path).await?;
        }
        Commands::Config => {
            let config = load_config(cli.wallet_file)?;
            println!("{}", serde_json::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}

fn load_config(wallet_file: Option<PathBuf>) -> Result<BootstrapConfig> {
    let config = BootstrapConfig::from_env()?;
    Ok(match wallet_file {
        Some(path) => config.with_wallet_data_path(path),
        None => config,
    })
}

async fn run_prepare(config: BootstrapConfig, wallet_actions: bool) -> Result<()> {
    let mut action_providers: Vec<Box<dyn ActionProvider>> = Vec::new();
    if wallet_actions {
        action_providers.push(Box::new(WalletActionProvider));
    }

    let bootstrapper = WalletBootstrapper::from_config(config, RpcConfig::from_env())
        .with_action_providers(action_providers);

    let (toolkit, provider) = bootstrapper.prepare().await?;
    let address = provider.address().await?;

    println!("Network:        {}", provider.network());
    println!("Provider:       {}", provider.name());
    println!("Wallet address: {}", address.to_checksum(None));

    let actions = toolkit.actions();
    if actions.is_empty() {
        println!("Actions:        (none)");
    } else {
        println!("Actions:");
        for action in actions {
            println!("  {:<20} {}", action.name, action.description);
        }
    }

    Ok(())
}

async fn run_show(path: PathBuf) -> Result<()> {
    let store = FileRecordStore::new(path);

    match store.load().await? {
        Some(record) => match record.address() {
            Some(address) => println!("{}", address),
            None => println!("No smart wallet address in {}", store.path().display()),
        },
        None => println!("No wallet record at {}", store.path().display()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["agentkit-prepare", "show", "--json", "-w", "w.json"]).unwrap();
        assert!(cli.json);
        assert!(!cli.verbose);
        assert_eq!(cli.wallet_file, Some(PathBuf::from("w.json")));
        assert!(matches!(cli.command, Commands::Show));
    }

    #[test]
    fn plain_text_logs_by_default() {
        let cli = Cli::try_parse_from(["agentkit-prepare", "prepare", "--wallet-actions"]).unwrap();
        assert!(!cli.json);
        assert!(matches!(
            cli.command,
            Commands::Prepare {
                wallet_actions: true
            }
        ));
    }

    #[tokio::test]
    async fn show_reads_record_from_store_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wallet_data.txt");
        std::fs::write(&path, r#"{"smartWalletAddress":"0xabc"}"#).unwrap();

        assert!(run_show(path).await.is_ok());
        assert!(run_show(dir.path().join("missing.txt")).await.is_ok());
    }
}
