mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pantry-cli")]
#[command(about = "Import recipes from Schema.org JSON-LD on recipe pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a recipe page and print the extracted recipe as JSON
    Extract {
        /// Absolute http(s) URL of the recipe page
        url: String,
    },
    /// Extract a recipe from a saved HTML file without touching the network
    Parse {
        /// Path to the saved page
        file: PathBuf,
        /// URL to record as the recipe's source
        #[arg(long, default_value = "")]
        url: String,
    },
    /// List the JSON-LD blocks found in a saved HTML file
    Blocks {
        /// Path to the saved page
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = pantry_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Extract { url } => commands::run_extract(&config, &url).await,
        Commands::Parse { file, url } => commands::run_parse(&file, &url),
        Commands::Blocks { file } => commands::run_blocks(&file),
    }
}
