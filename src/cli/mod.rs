//! CLI module for QuickCut
//!
//! Argument parsing and command dispatch. Each command drives the same
//! application layer an interactive front end would.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::QuickCutConfig;
use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;

/// QuickCut video trimmer
///
/// Pick a clip out of a video, give it a color filter and save it.
#[derive(Parser, Debug)]
#[command(name = "quickcut")]
#[command(about = "QuickCut - trim a video and apply a color filter")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (default: ./quickcut.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the filter presets
    Filters,
    /// Print the duration of a video
    Probe(args::ProbeArgs),
    /// Build the export job for a trim and filter without encoding
    Plan(args::PlanArgs),
    /// Trim, filter and save a clip into a folder
    Export(args::ExportArgs),
}

impl Cli {
    /// Command-line values win over everything loaded before them
    pub fn apply_overrides(&self, config: &mut QuickCutConfig) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.json_logs {
            config.log_format = LogFormat::Json;
        }
    }

    pub async fn run(self, config: &QuickCutConfig) -> Result<()> {
        match self.command {
            Commands::Filters => commands::filters(config),
            Commands::Probe(args) => commands::probe(config, args).await,
            Commands::Plan(args) => commands::plan(config, args).await,
            Commands::Export(args) => commands::export(config, args).await,
        }
    }
}
