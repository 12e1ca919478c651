mod browse;
mod deals;
mod terminal;

use clap::{Parser, Subcommand};
use dealsdb_core::{load_translations, Translations};
use dealsdb_source::{RestSource, RestSourceConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dealsdb-cli")]
#[command(about = "Browse the deals listing from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print listing pages for a set of filters
    Deals(deals::DealsArgs),
    /// Interactive listing driven by line commands on stdin
    Browse(browse::BrowseArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = dealsdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let translations = match load_translations(&config.translations_path) {
        Ok(translations) => translations,
        Err(e) => {
            tracing::warn!(error = %e, "translations unavailable, using built-in English");
            Translations::default()
        }
    };
    let source = RestSource::new(RestSourceConfig::from_app_config(&config))?;

    match cli.command {
        Commands::Deals(args) => deals::run_deals(source, &config, translations, args).await,
        Commands::Browse(args) => browse::run_browse(source, &config, translations, args).await,
    }
}
