//! Configuration loader and validator
//!
//! Loads device and calibration settings from TOML files in the configs/
//! directory.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use log::{debug, info};

use crate::nunchuck::constants::NUNCHUCK_ADDRESS;
use crate::nunchuck::types::Calibration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Bus settings
    #[serde(default)]
    pub device: DeviceSettings,

    /// Per-device calibration
    #[serde(default)]
    pub calibration: Calibration,
}

/// Bus settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// 7-bit bus address
    #[serde(default = "default_address")]
    pub address: u8,

    /// Delay between polls in the monitor loop (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            address: default_address(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_address() -> u8 { NUNCHUCK_ADDRESS }
fn default_poll_interval_ms() -> u64 { 10 }

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        info!("Loading configuration from: {}", path_ref.display());

        let content = std::fs::read_to_string(path_ref)?;
        let config = Self::from_toml(&content)?;

        info!("✓ Config loaded");
        Ok(config)
    }

    /// Load default configuration from configs/default.toml
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load("configs/default.toml")
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;

        debug!("  - Address: 0x{:02X}", config.device.address);
        debug!("  - Poll interval: {} ms", config.device.poll_interval_ms);
        debug!("  - Calibration: {:?}", config.calibration);

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.address > 0x7F {
            return Err(ConfigError::Invalid(format!(
                "address 0x{:02X} is not a 7-bit address",
                self.device.address
            )));
        }

        if self.device.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be positive".into()
            ));
        }

        if !(self.calibration.radius > 0.0) {
            return Err(ConfigError::Invalid(
                "radius must be positive".into()
            ));
        }

        if self.calibration.joy_threshold < 0 {
            return Err(ConfigError::Invalid(
                "joy_threshold must not be negative".into()
            ));
        }

        Ok(())
    }
}
