//! listing-scout command line entry point

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use listing_scout::application::ScrapeRun;
use listing_scout::infrastructure::{
    AppConfig, ConfigError, HttpPageDriver, logging, save_to_csv, write_csv,
};

/// Rows shown in the terminal preview
const PREVIEW_ROWS: usize = 5;

/// Scrape Warsaw apartment listings from Otodom into a CSV dataset
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Config file (TOML, YAML or JSON) layered over the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Search results URL to paginate
    #[arg(long)]
    feed_url: Option<String>,

    /// Maximum number of feed pages to visit
    #[arg(long)]
    max_pages: Option<u32>,

    /// Maximum number of listings to collect and scrape
    #[arg(long)]
    max_results: Option<usize>,

    /// Directory the CSV file is written into
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the preview only, do not write a CSV file
    #[arg(long)]
    no_save: bool,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) -> Result<(), ConfigError> {
        if let Some(feed_url) = &self.feed_url {
            config.scraper.feed_url = feed_url.clone();
        }
        if let Some(max_pages) = self.max_pages {
            config.scraper.max_pages = max_pages;
        }
        if let Some(max_results) = self.max_results {
            config.scraper.max_results = max_results;
        }
        if let Some(output) = &self.output {
            config.output.folder = output.clone();
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config).context("Invalid command line settings")?;

    logging::init_logging_with_config(&config.logging)?;
    logging::log_system_info();

    let driver = HttpPageDriver::new(&config.http).context("Failed to build HTTP page driver")?;
    let outcome = ScrapeRun::new(driver, config.scraper.clone()).run().await;
    info!("Run summary: {}", serde_json::to_string(&outcome.summary)?);
    info!("Collection: {}", serde_json::to_string(&outcome.collection)?);

    if outcome.is_empty() {
        println!("No data collected");
        return Ok(());
    }

    println!("Collected {} apartments", outcome.records.len());
    let preview = &outcome.records[..outcome.records.len().min(PREVIEW_ROWS)];
    write_csv(preview, std::io::stdout().lock()).context("Failed to print preview")?;

    if args.no_save {
        info!("Skipping CSV export (--no-save)");
        return Ok(());
    }

    let path = save_to_csv(&outcome.records, &config.output.folder, None).context("Failed to save CSV")?;
    println!("Saved: {}", path.display());

    Ok(())
}
