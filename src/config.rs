//! Process configuration: ffmpeg binary and JPEG defaults.

use std::path::Path;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding the ffmpeg binary.
pub const ENV_FFMPEG_BIN: &str = "IMAGERUNNER_FFMPEG_BIN";
/// Environment variable overriding the default JPEG quality.
pub const ENV_JPEG_QUALITY: &str = "IMAGERUNNER_JPEG_QUALITY";

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Configuration for the crate
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External process configuration
    pub ffmpeg: FfmpegConfig,
    /// JPEG encoding configuration
    pub jpeg: JpegConfig,
}

/// External ffmpeg configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// Binary name or path, resolved on `PATH` when it has no separator
    pub binary: String,
}

/// JPEG encoding configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JpegConfig {
    /// Quality used when a caller does not pass one (0-100)
    pub default_quality: u8,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: String::from("ffmpeg"),
        }
    }
}

impl Default for JpegConfig {
    fn default() -> Self {
        Self {
            default_quality: crate::core::convert::DEFAULT_JPEG_QUALITY,
        }
    }
}

impl Config {
    /// Build a configuration from defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(binary) = std::env::var(ENV_FFMPEG_BIN) {
            if !binary.trim().is_empty() {
                config.ffmpeg.binary = binary;
            }
        }

        if let Ok(quality) = std::env::var(ENV_JPEG_QUALITY) {
            config.jpeg.default_quality = quality.trim().parse().map_err(|e| {
                AppError::Config(format!("{} must be an integer 0-100: {}", ENV_JPEG_QUALITY, e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg.binary.trim().is_empty() {
            return Err(AppError::Config("ffmpeg binary must not be empty".to_string()));
        }
        if self.jpeg.default_quality > 100 {
            return Err(AppError::Config(format!(
                "JPEG quality must be between 0 and 100, got {}",
                self.jpeg.default_quality
            )));
        }
        Ok(())
    }
}

/// Process-wide configuration, read from the environment on first use.
///
/// Falls back to [`Config::default`] if the environment holds invalid values.
pub fn global() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::from_env().unwrap_or_else(|e| {
            log::warn!("Ignoring environment configuration: {}", e);
            Config::default()
        })
    })
}

/// Install the process-wide configuration.
///
/// # Errors
///
/// Fails if the configuration is invalid or a configuration is already in use.
pub fn install(config: Config) -> Result<()> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| AppError::Config("configuration already initialized".to_string()))
}
