//! Townland boundary fetch for a single county.
//!
//! Loads the DED collection written by `deds`, fetches the county's
//! townlands from Overpass and tags each townland with the DED containing
//! its centroid.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use townlands::census::translate_county_name;
use townlands::config::Config;
use townlands::output::{read_collection, write_collection};
use townlands::overpass::OverpassClient;
use townlands::pipeline::fetch_townlands;

#[derive(Parser, Debug)]
#[command(name = "townlands")]
#[command(about = "Fetch a county's townlands and match them to their DEDs")]
struct Args {
    /// County as labelled in the census, e.g. "Tyrone" or "Queen's Co."
    county: String,

    /// TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// DED GeoJSON produced by `deds` (overrides config)
    #[arg(long)]
    deds: Option<PathBuf>,

    /// Output GeoJSON file (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_or_default(args.config.as_deref())?;
    let deds_path = args.deds.unwrap_or_else(|| config.output.deds.clone());
    let output_path = args.output.unwrap_or_else(|| config.output.townlands.clone());
    let county = translate_county_name(&args.county);

    info!("Loading DED data");
    let deds = read_collection(&deds_path)
        .with_context(|| format!("Failed to load DEDs from {}", deds_path.display()))?;

    let overpass = OverpassClient::new(&config.overpass.endpoint, config.overpass_request_timeout())?;
    let townlands = fetch_townlands(&overpass, &county, &deds, &config).await?;

    info!("Writing output file");
    write_collection(&output_path, &townlands)?;

    Ok(())
}
