//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the text-watch.toml file.
//! It covers display geometry, slide timing, the weather provider and the battery source.

use crate::animation::{Curve, Timing};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE: &str = "text-watch.toml";

/// Errors raised while persisting configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialize: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Application configuration loaded from text-watch.toml
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Screen geometry and colours
    pub display: DisplayConfig,
    /// Line slide timing
    pub animation: AnimationConfig,
    /// Weather provider
    pub weather: WeatherConfig,
    /// Battery source
    pub battery: BatteryConfig,
}

/// Display configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Screen width in pixels; also the distance a line slides
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
    /// Dark text on a light background instead of light on dark (pixel output)
    pub invert: bool,
    /// Interval between animation frames in milliseconds
    pub frame_interval_ms: u64,
}

/// Slide animation configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of one slide in milliseconds
    pub duration_ms: u64,
    /// Timing curve of both slides
    pub curve: Curve,
}

/// Weather provider configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Fetch weather at all
    pub enabled: bool,
    /// Provider endpoint for current conditions
    pub endpoint: String,
    /// OpenWeatherMap API key, sent as `appid` when non-empty
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Battery source configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct BatteryConfig {
    /// Power-supply capacity file
    pub capacity_path: String,
    /// Fixed charge to report instead of reading `capacity_path`
    pub fixed_percent: Option<u8>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 144,
            height: 168,
            invert: false,
            frame_interval_ms: 33,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            duration_ms: 400,
            curve: Curve::EaseOut,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        WeatherConfig {
            enabled: true,
            endpoint: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            api_key: String::new(),
            latitude: 43.6591,
            longitude: -70.2568,
            timeout_secs: 15,
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        BatteryConfig {
            capacity_path: "/sys/class/power_supply/BAT0/capacity".to_string(),
            fixed_percent: None,
        }
    }
}

impl AnimationConfig {
    /// Timing handed to every line slide.
    pub fn timing(&self) -> Timing {
        Timing {
            duration: Duration::from_millis(self.duration_ms),
            curve: self.curve,
        }
    }
}

impl Config {
    /// Load configuration from text-watch.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded configuration");
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!(path = %path.display(), "no config file found, using default configuration");
                Self::default()
            }
        }
    }

    /// Save current configuration to `path`
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path.as_ref(), contents)?;
        info!(path = %path.as_ref().display(), "configuration saved");
        Ok(())
    }

    /// Save current configuration to text-watch.toml
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(CONFIG_FILE)
    }
}
