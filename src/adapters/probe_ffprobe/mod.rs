//! FFprobe adapter for source selection
//!
//! A source is usable once ffprobe reports a container duration for it.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// FFprobe-based source picker
pub struct FfprobeSourceAdapter {
    ffprobe_path: String,
}

#[derive(Debug, Deserialize)]
struct ProbeReport {
    #[serde(default)]
    format: Option<ProbeFormat>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    duration: Option<String>,
}

impl FfprobeSourceAdapter {
    pub fn new(ffprobe_path: impl Into<String>) -> Self {
        Self {
            ffprobe_path: ffprobe_path.into(),
        }
    }

    /// Container duration of `location` in milliseconds
    pub async fn probe_duration_ms(&self, location: &str) -> Result<u64, DomainError> {
        if !Path::new(location).is_file() {
            return Err(DomainError::FileNotFound(location.to_string()));
        }

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
                location,
            ])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                DomainError::ProbeFail(format!("Failed to start {}: {}", self.ffprobe_path, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProbeFail(format!(
                "ffprobe exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_probe_output(&output.stdout)
    }
}

/// Extract the duration from `ffprobe -of json` output
pub fn parse_probe_output(stdout: &[u8]) -> Result<u64, DomainError> {
    let report: ProbeReport = serde_json::from_slice(stdout)
        .map_err(|e| DomainError::ProbeFail(format!("Unreadable ffprobe output: {}", e)))?;

    let seconds: f64 = report
        .format
        .and_then(|f| f.duration)
        .ok_or_else(|| DomainError::ProbeFail("ffprobe reported no duration".to_string()))?
        .trim()
        .parse()
        .map_err(|e| DomainError::ProbeFail(format!("Invalid duration: {}", e)))?;

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(DomainError::ProbeFail(format!("Invalid duration: {}", seconds)));
    }

    Ok((seconds * 1000.0).round() as u64)
}

#[async_trait]
impl SourcePicker for FfprobeSourceAdapter {
    async fn pick_source(&self, location: &str) -> Option<SourceSelection> {
        match self.probe_duration_ms(location).await {
            Ok(duration_ms) => {
                debug!(location, duration_ms, "source probed");
                Some(SourceSelection::new(SourceRef::new(location), duration_ms))
            }
            Err(e) => {
                warn!(location, error = %e, "source could not be read");
                None
            }
        }
    }
}
