mod output;
mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medspa_core::{AppConfig, SearchRadius};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medspa")]
#[command(about = "Find med spas and aesthetic clinics near a ZIP code or your position")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search around a ZIP or postal code
    Search {
        /// ZIP or postal code to search from
        #[arg(long)]
        zip: String,
        /// Search radius in miles (5, 10, 25 or 50)
        #[arg(long)]
        radius: Option<SearchRadius>,
        /// Print results as JSON instead of a list
        #[arg(long)]
        json: bool,
        /// Also write the result map as GeoJSON to this path
        #[arg(long, value_name = "PATH")]
        geojson: Option<PathBuf>,
    },
    /// Follow device positions from stdin, one `lat,lng[,accuracy_m]` per line
    Watch {
        /// Search radius in miles (5, 10, 25 or 50)
        #[arg(long)]
        radius: Option<SearchRadius>,
        /// Print each update as one line of JSON
        #[arg(long)]
        json: bool,
        /// Rewrite the result map as GeoJSON to this path after every update
        #[arg(long, value_name = "PATH")]
        geojson: Option<PathBuf>,
        /// Stop after this many completed searches
        #[arg(long)]
        max_updates: Option<u32>,
    },
    /// Print the keywords each search runs
    Keywords {
        /// YAML keyword list; the built-in list is used when unset
        #[arg(long, env = "MEDSPA_KEYWORDS_PATH")]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            zip,
            radius,
            json,
            geojson,
        } => {
            let config = load_config()?;
            let opts = run_options(radius, json, geojson, config.default_radius);
            search::run_search(&config, &zip, &opts).await
        }
        Commands::Watch {
            radius,
            json,
            geojson,
            max_updates,
        } => {
            let config = load_config()?;
            let opts = run_options(radius, json, geojson, config.default_radius);
            search::run_watch(&config, &opts, max_updates).await
        }
        // Needs no API key, so it runs without loading configuration.
        Commands::Keywords { file } => {
            init_tracing("warn")?;
            search::run_keywords(file.as_deref())
        }
    }
}

fn load_config() -> anyhow::Result<AppConfig> {
    let config = medspa_core::load_app_config_from_env()?;
    init_tracing(&config.log_level)?;
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

/// An explicit `--radius` wins over the configured default.
fn run_options(
    radius: Option<SearchRadius>,
    json: bool,
    geojson: Option<PathBuf>,
    default_radius: SearchRadius,
) -> search::RunOptions {
    search::RunOptions {
        radius: radius.unwrap_or(default_radius),
        json,
        geojson,
    }
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` wins over
/// the configured level.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
