//! Configuration loading and management.

mod loader;

pub use loader::{Config, ConfigError, DiscoverySettings, LoggingSettings, example_config};
