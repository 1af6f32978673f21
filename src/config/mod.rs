//! Configuration loading with precedence CLI > environment > file > defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{QuickCutError, QuickCutResult};
use crate::output::Locale;
use crate::utils::logging::{self, LogFormat};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "quickcut.toml";

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuickCutConfig {
    pub log_level: String,
    pub log_format: LogFormat,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Where temp artifacts go; system temp dir when unset
    pub temp_dir: Option<PathBuf>,
    pub video_codec: String,
    pub audio_codec: String,
    /// Constant Rate Factor (0-51)
    pub crf: u8,
    pub preset: String,
    /// Program invoked with the artifact path to share it
    pub share_command: Option<String>,
    pub locale: Locale,
}

impl Default for QuickCutConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            ffmpeg_path: "ffmpeg".to_string(),
            ffprobe_path: "ffprobe".to_string(),
            temp_dir: None,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            crf: 18,
            preset: "medium".to_string(),
            share_command: None,
            locale: Locale::En,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    quickcut: QuickCutConfig,
}

impl QuickCutConfig {
    /// Parse the `[quickcut]` section; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> QuickCutResult<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        Ok(file.quickcut)
    }

    pub fn from_file(path: &Path) -> QuickCutResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| QuickCutError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize back into the on-disk layout
    pub fn to_toml_string(&self) -> QuickCutResult<String> {
        #[derive(Serialize)]
        struct Out<'a> {
            quickcut: &'a QuickCutConfig,
        }
        toml::to_string(&Out { quickcut: self }).map_err(|e| QuickCutError::ConfigError {
            message: format!("Failed to serialize config: {}", e),
        })
    }

    /// Apply `QUICKCUT_*` environment overrides
    pub fn apply_env(&mut self) -> QuickCutResult<usize> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; returns how many were applied
    pub fn apply_env_from<F>(&mut self, lookup: F) -> QuickCutResult<usize>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("QUICKCUT_LOG_LEVEL") {
            self.log_level = value;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_LOG_FORMAT") {
            self.log_format = LogFormat::parse(&value)?;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_FFMPEG_PATH") {
            self.ffmpeg_path = value;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_FFPROBE_PATH") {
            self.ffprobe_path = value;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_TEMP_DIR") {
            self.temp_dir = Some(PathBuf::from(value));
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_CRF") {
            self.crf = value.trim().parse().map_err(|e| QuickCutError::ConfigError {
                message: format!("Invalid CRF value {}: {}", value, e),
            })?;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_PRESET") {
            self.preset = value;
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_SHARE_COMMAND") {
            self.share_command = Some(value);
            applied += 1;
        }
        if let Some(value) = lookup("QUICKCUT_LOCALE") {
            self.locale = Locale::parse(&value).ok_or_else(|| QuickCutError::ConfigError {
                message: format!("Invalid locale: {}. Valid locales: en, ru", value),
            })?;
            applied += 1;
        }

        Ok(applied)
    }

    /// Validate configuration
    pub fn validate(&self) -> QuickCutResult<()> {
        logging::validate_level(&self.log_level)?;

        if self.crf > 51 {
            return Err(QuickCutError::ConfigError {
                message: "CRF value cannot exceed 51".to_string(),
            });
        }
        if self.ffmpeg_path.trim().is_empty() || self.ffprobe_path.trim().is_empty() {
            return Err(QuickCutError::ConfigError {
                message: "ffmpeg_path and ffprobe_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Resolve the configuration for this run (everything below the CLI layer)
pub fn load(explicit: Option<&Path>) -> QuickCutResult<QuickCutConfig> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            QuickCutConfig::from_file(path)?
        }
        None => {
            let fallback = Path::new(DEFAULT_CONFIG_FILE);
            if fallback.exists() {
                info!("Loading configuration from: {}", fallback.display());
                QuickCutConfig::from_file(fallback)?
            } else {
                debug!("No config file found, using defaults");
                QuickCutConfig::default()
            }
        }
    };

    let overrides = config.apply_env()?;
    if overrides > 0 {
        debug!("Applied {} environment variable overrides", overrides);
    }

    config.validate()?;
    Ok(config)
}
