use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "storefind")]
#[command(about = "Resolve grocery store chains to real-world locations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a single store name near a postal code or coordinate pair.
    Resolve {
        /// Free-text store or chain name, e.g. "Kroger".
        #[arg(long)]
        name: String,
        /// User postal code (enables the persistent cache tier).
        #[arg(long)]
        zip: Option<String>,
        /// User latitude; requires --lng.
        #[arg(long, requires = "lng")]
        lat: Option<f64>,
        /// User longitude; requires --lat.
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
        /// Scraper-style address hint to try before searching.
        #[arg(long)]
        hint: Option<String>,
    },
    /// Resolve every store of a brand from `grocery_stores` near a postal code.
    Batch {
        /// Canonical brand slug, e.g. "kroger".
        #[arg(long)]
        brand: String,
        /// User postal code used as the search origin for every store.
        #[arg(long)]
        zip: String,
    },
    /// Persistent cache maintenance.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Run pending database migrations.
    Migrate,
}

#[derive(Debug, Subcommand)]
enum CacheAction {
    /// Print entry counts for the persistent cache.
    Stats,
    /// Delete entries older than the configured TTL.
    Purge,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = storefind_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve {
            name,
            zip,
            lat,
            lng,
            hint,
        } => commands::resolve(&config, name, zip, lat.zip(lng), hint).await,
        Commands::Batch { brand, zip } => commands::batch(&config, &brand, &zip).await,
        Commands::Cache { action } => match action {
            CacheAction::Stats => commands::cache_stats(&config).await,
            CacheAction::Purge => commands::cache_purge(&config).await,
        },
        Commands::Migrate => commands::migrate(&config).await,
    }
}
