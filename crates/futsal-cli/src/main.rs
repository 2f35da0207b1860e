mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::search::SearchArgs;

#[derive(Debug, Parser)]
#[command(name = "futsal-cli")]
#[command(about = "Find bookable futsal courts near a place and time")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for available courts and print them as JSON
    Search(SearchArgs),
    /// Resolve a place name to coordinates
    Geocode {
        /// Free-text place name (e.g., 잠실)
        place: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = futsal_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Search(args)) => search::run_search(&config, &args).await?,
        Some(Commands::Geocode { place }) => search::run_geocode(&config, &place).await?,
        None => println!("futsal-cli: run with --help to list commands"),
    }

    Ok(())
}
