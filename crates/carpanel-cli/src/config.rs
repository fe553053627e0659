//! Configuration loading and validation

use anyhow::{bail, Result};
use carpanel_client::PanelOptions;
use carpanel_core::Capabilities;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vehicle: VehicleConfig,
    #[serde(default)]
    pub panel: PanelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Base URL of the car's web server
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "http://192.168.4.1".to_string() // car's soft-AP address
}

fn default_timeout() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Firmware supports the `auto` command
    #[serde(default = "default_true")]
    pub autonomous_mode: bool,
    /// Speed readout animation tick in milliseconds
    #[serde(default = "default_animation_period")]
    pub animation_period_ms: u64,
    /// Speed readout change per tick
    #[serde(default = "default_speed_step")]
    pub speed_step: u8,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            autonomous_mode: true,
            animation_period_ms: default_animation_period(),
            speed_step: default_speed_step(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_animation_period() -> u64 {
    5
}

fn default_speed_step() -> u8 {
    2
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.vehicle.timeout_secs)
    }

    /// Convert to client panel options
    pub fn panel_options(&self) -> PanelOptions {
        PanelOptions {
            capabilities: Capabilities {
                autonomous: self.panel.autonomous_mode,
            },
            animation_tick: Duration::from_millis(self.panel.animation_period_ms),
            ramp_step: self.panel.speed_step,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.vehicle.timeout_secs == 0 {
            bail!("vehicle.timeout_secs must be at least 1");
        }
        if self.panel.animation_period_ms == 0 {
            bail!("panel.animation_period_ms must be at least 1");
        }
        if self.panel.speed_step == 0 {
            bail!("panel.speed_step must be at least 1");
        }
        Ok(())
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(path = %path.display(), "Loaded configuration");
        config
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)?;
    Ok(())
}
