//! Configuration loading and management.

use crate::sysfs::{DiscoveryMode, SYSFS_USB_DEVICES, SysfsDiscovery};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Discovery settings.
    #[serde(default)]
    pub discovery: DiscoverySettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Discovery settings.
#[derive(Debug, Deserialize)]
pub struct DiscoverySettings {
    /// Directory holding the USB bus device links.
    #[serde(default = "default_sysfs_path")]
    pub sysfs_path: PathBuf,

    /// Skip devices that cannot be read instead of failing the whole pass.
    #[serde(default)]
    pub best_effort: bool,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            sysfs_path: default_sysfs_path(),
            best_effort: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Deserialize)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_sysfs_path() -> PathBuf {
    PathBuf::from(SYSFS_USB_DEVICES)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from default locations.
    /// Search order:
    /// 1. ./hotplugd.toml
    /// 2. ~/.config/hotplugd/config.toml
    /// 3. /etc/hotplugd.toml
    pub fn load() -> Result<Self, ConfigError> {
        let paths = Self::config_paths();

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        // No config file found - use defaults
        Ok(Config::default())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Get list of possible config paths.
    fn config_paths() -> Vec<Option<PathBuf>> {
        vec![
            std::env::current_dir().ok().map(|p| p.join("hotplugd.toml")),
            dirs::config_dir().map(|p| p.join("hotplugd").join("config.toml")),
            Some(PathBuf::from("/etc/hotplugd.toml")),
        ]
    }

    /// Discovery mode selected by the settings.
    pub fn discovery_mode(&self) -> DiscoveryMode {
        if self.discovery.best_effort {
            DiscoveryMode::BestEffort
        } else {
            DiscoveryMode::Strict
        }
    }

    /// Build a discovery engine from the settings.
    pub fn discovery(&self) -> SysfsDiscovery {
        SysfsDiscovery::with_base_path(&self.discovery.sysfs_path)
            .with_mode(self.discovery_mode())
    }
}

/// Example configuration file with every setting at its default.
pub fn example_config() -> &'static str {
    r#"# hotplugd configuration
#
# Search order:
#   ./hotplugd.toml
#   ~/.config/hotplugd/config.toml
#   /etc/hotplugd.toml

[discovery]
# Directory holding the USB bus device links
sysfs_path = "/sys/bus/usb/devices"

# Skip devices with broken links or unreadable IDs instead of failing
best_effort = false

[logging]
# Default log filter, overridden by RUST_LOG
level = "warn"
"#
}
