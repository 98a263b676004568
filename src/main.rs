//! # Civica CLI (`civica`)
//!
//! Command-line interface for the directory aggregation engine.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `civica lookup` | Look up officials for an address, zip, or point |
//! | `civica providers` | List upstream providers and credential status |
//! | `civica serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Officials for a zip code
//! civica lookup --zip 94105
//!
//! # Machine-readable output, city level only
//! civica lookup --address "1 Dr Carlton B Goodlett Pl, San Francisco, CA" \
//!     --level city --json
//!
//! # Start the HTTP server
//! civica serve --config ./config/civica.toml
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use civica::aggregate::{self, AggregateRequest};
use civica::config::{self, Config};
use civica::geocode::LocationQuery;
use civica::models::Level;
use civica::providers;
use civica::server;

/// Civica — find the elected officials covering a location.
#[derive(Parser)]
#[command(
    name = "civica",
    about = "Civic official directory aggregation and ranking engine",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Falls back to built-in defaults
    /// when the file does not exist.
    #[arg(long, global = true, default_value = "./config/civica.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the officials covering a location.
    ///
    /// Requires at least one of --address, --zip, or --lat/--lng. Results
    /// are grouped by jurisdiction level and ranked for display.
    Lookup {
        /// Free-form street address.
        #[arg(long)]
        address: Option<String>,
        /// 5-digit zip code.
        #[arg(long)]
        zip: Option<String>,
        /// Latitude (requires --lng).
        #[arg(long)]
        lat: Option<f64>,
        /// Longitude (requires --lat).
        #[arg(long)]
        lng: Option<f64>,
        /// Include vacated and historical seats.
        #[arg(long, default_value_t = false)]
        include_past: bool,
        /// Restrict output to one level (federal, state, regional, county,
        /// city, local).
        #[arg(long)]
        level: Option<String>,
        /// Emit machine-readable JSON instead of the table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List upstream providers and whether their credentials are configured.
    Providers,

    /// Start the HTTP API server.
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_or_default(&cli.config)?;

    match cli.command {
        Commands::Lookup {
            address,
            zip,
            lat,
            lng,
            include_past,
            level,
            json,
        } => {
            let level = match level {
                None => None,
                Some(raw) => Some(
                    raw.parse::<Level>()
                        .map_err(|e| anyhow::anyhow!(e))?,
                ),
            };
            let request = AggregateRequest {
                query: LocationQuery {
                    address,
                    zip,
                    lat,
                    lng,
                },
                current_only: !include_past,
                level,
            };
            run_lookup(&config, &request, json).await
        }
        Commands::Providers => providers::list_providers(&config),
        Commands::Serve => server::run_server(&config).await,
    }
}

fn load_or_default(path: &PathBuf) -> Result<Config> {
    if path.exists() {
        config::load_config(path)
    } else {
        Ok(Config::default())
    }
}

async fn run_lookup(config: &Config, request: &AggregateRequest, json: bool) -> Result<()> {
    let result = aggregate::lookup_officials(config, request).await?;

    if json {
        let body = serde_json::json!({
            "location": result.location,
            "officeHolders": result.office_holders,
            "byLevel": result.by_level,
            "count": result.count,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!(
        "Officials for {} ({} found)",
        describe_location(&result.location),
        result.count
    );

    for bucket in &result.by_level {
        if bucket.members.is_empty() {
            continue;
        }
        println!("\n{}", bucket.level.as_str().to_uppercase());
        for holder in &bucket.members {
            let name = holder
                .person
                .as_ref()
                .map(|p| p.full_name.as_str())
                .unwrap_or("(vacant)");
            let party = holder
                .parties
                .first()
                .map(|p| format!(" [{}]", p.name))
                .unwrap_or_default();
            println!("  {:<40} {}{}", holder.position.name, name, party);
        }
    }

    Ok(())
}

fn describe_location(location: &civica::models::LocationDescriptor) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(city) = &location.city {
        parts.push(city.clone());
    }
    if let Some(county) = &location.county {
        parts.push(county.clone());
    }
    parts.push(location.state.clone());
    if let Some(zip) = &location.zip {
        parts.push(zip.clone());
    }
    parts.join(", ")
}
