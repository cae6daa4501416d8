use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;

use commands::{AccountCommand, ConfigCommand, PrayerCommand};
use prayertrack::client::{EntryCache, HttpApi, MutationController};
use prayertrack::config::Config;

#[derive(Parser)]
#[command(name = "prayertrack")]
#[command(version)]
#[command(about = "Keep track of prayer requests and answered prayers", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage prayer requests
    Prayer(PrayerCommand),

    /// Register, log in, or log out
    Account(AccountCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Prayer(cmd)) => {
            let api = HttpApi::new(config.server_url.value.clone(), config.token());
            let controller = MutationController::new(api, Arc::new(EntryCache::new()));
            cmd.run(&controller).await?;
        }
        Some(Commands::Account(cmd)) => {
            cmd.run(&mut config).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
