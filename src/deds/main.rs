//! DED boundary fetch.
//!
//! Enumerates counties from the census metadata API, fetches each county's
//! District Electoral Divisions from Overpass and writes them all to one
//! GeoJSON FeatureCollection.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use townlands::census::CensusClient;
use townlands::config::Config;
use townlands::output::write_collection;
use townlands::overpass::OverpassClient;
use townlands::pipeline::fetch_deds;

#[derive(Parser, Debug)]
#[command(name = "deds")]
#[command(about = "Fetch DED boundaries for every census county from OpenStreetMap")]
struct Args {
    /// TOML config file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output GeoJSON file (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only fetch these counties, e.g. "County Cork" (skips the census API)
    #[arg(long)]
    county: Vec<String>,
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
    let output_path = args.output.unwrap_or_else(|| config.output.deds.clone());

    let counties = if args.county.is_empty() {
        let census = CensusClient::new(
            &config.census.endpoint,
            config.county_variable(),
            config.census_request_timeout(),
        )?;
        census
            .county_names()
            .await
            .context("Failed to get county names from census API")?
    } else {
        args.county.clone()
    };

    let overpass = OverpassClient::new(&config.overpass.endpoint, config.overpass_request_timeout())?;
    info!(
        "Fetching DEDs for {} counties from {}",
        counties.len(),
        overpass.endpoint()
    );

    let pb = ProgressBar::new(counties.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} counties")?
            .progress_chars("#>-"),
    );

    let deds = fetch_deds(&overpass, &counties, &config, &pb).await?;
    pb.finish_with_message("Fetching complete");

    info!("Writing output file");
    write_collection(&output_path, &deds)?;

    Ok(())
}
