//! QuickCut video trimmer
//!
//! # Usage
//!
//! ```bash
//! quickcut filters
//! quickcut plan --input trip.mp4 --duration-ms 65000 --start 0:05 --end 0:20 --filter sepia
//! quickcut export --input trip.mp4 --dest ~/Movies --start 0:05 --end 0:20 --filter warm
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use quickcut::cli::Cli;
use quickcut::config;
use quickcut::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    logging::init(&config.log_level, config.log_format)?;
    debug!(?config, "configuration resolved");
    info!("Starting QuickCut");

    cli.run(&config).await?;

    debug!("QuickCut finished");
    Ok(())
}
