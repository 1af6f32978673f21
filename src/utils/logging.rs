//! Logging setup on top of tracing-subscriber

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::error::{QuickCutError, QuickCutResult};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// JSON format for structured logging
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> QuickCutResult<Self> {
        match value.trim().to_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(QuickCutError::ConfigError {
                message: format!("Invalid log format: {}. Valid formats: pretty, json", other),
            }),
        }
    }
}

/// Valid values for `log_level`
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Check a log level name
pub fn validate_level(level: &str) -> QuickCutResult<()> {
    if LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(QuickCutError::ConfigError {
            message: format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level
            ),
        })
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
/// Calling this again after a subscriber exists is a no-op.
pub fn init(level: &str, format: LogFormat) -> QuickCutResult<()> {
    validate_level(level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Pretty => builder.with_target(false).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if let Err(e) = result {
        tracing::debug!("subscriber already installed: {}", e);
    }

    tracing::debug!(level, ?format, "logging initialized");
    Ok(())
}
