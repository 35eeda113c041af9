//! USB device discovery
//!
//! A library and CLI tool for enumerating USB devices attached to a Linux host
//! by walking `/sys/bus/usb/devices`.

pub mod config;
pub mod logging;
pub mod model;
pub mod sysfs;

pub use config::Config;
pub use model::UsbDevice;
pub use sysfs::{DiscoveryMode, SysfsDiscovery, SysfsError};
