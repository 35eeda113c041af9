//! USB device discovery from sysfs.
//!
//! `/sys/bus/usb/devices` holds one symlink per USB device, root hub,
//! configuration and interface. Only entries named `<bus>-<port>` or
//! `<bus>-<port>.<port>` are attached devices; root hubs (`usb1`), interfaces
//! (`1-1:1.0`) and anything that is not a symlink are ignored.

use crate::model::UsbDevice;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Default location of the USB bus device links.
pub const SYSFS_USB_DEVICES: &str = "/sys/bus/usb/devices";

static DEVICE_LINK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+-[0-9]+(\.[0-9]+)?$").expect("device link pattern is valid")
});

/// Errors that abort a discovery pass.
#[derive(Debug, Error)]
pub enum SysfsError {
    #[error("Cannot list USB devices in {}", .path.display())]
    Enumerate {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot resolve device link {}", .link.display())]
    Resolve {
        link: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot read attribute '{attr}' of {}", .node.display())]
    Attribute {
        node: PathBuf,
        attr: &'static str,
        source: std::io::Error,
    },
}

/// How per-device failures are handled during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryMode {
    /// Any broken link or unreadable mandatory attribute fails the whole pass.
    #[default]
    Strict,
    /// Devices that cannot be resolved or populated are skipped with a warning.
    BestEffort,
}

/// Check whether a bus directory entry name identifies an attached device.
pub fn is_device_link(name: &str) -> bool {
    DEVICE_LINK_PATTERN.is_match(name)
}

/// Enumerates USB devices from the sysfs bus directory.
#[derive(Debug, Clone)]
pub struct SysfsDiscovery {
    base_path: PathBuf,
    mode: DiscoveryMode,
}

impl Default for SysfsDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl SysfsDiscovery {
    /// Create a discovery rooted at the default sysfs path.
    pub fn new() -> Self {
        Self::with_base_path(SYSFS_USB_DEVICES)
    }

    /// Create a discovery with a custom base path (for testing).
    pub fn with_base_path(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            mode: DiscoveryMode::default(),
        }
    }

    /// Set how per-device failures are handled.
    pub fn with_mode(mut self, mode: DiscoveryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn mode(&self) -> DiscoveryMode {
        self.mode
    }

    /// Discover all USB devices currently attached.
    ///
    /// Devices are returned in directory listing order. Failing to list the
    /// bus directory is always an error. In [`DiscoveryMode::Strict`] the first
    /// device that cannot be resolved or populated also aborts the pass and no
    /// devices are returned.
    pub fn discover(&self) -> Result<Vec<UsbDevice>, SysfsError> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| self.enumerate_error(e))?;

        let mut devices = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.enumerate_error(e))?;
            let file_name = entry.file_name();

            let Some(name) = file_name.to_str().filter(|name| is_device_link(name)) else {
                debug!(entry = ?file_name, "Skipping non-device entry");
                continue;
            };

            let file_type = entry.file_type().map_err(|e| self.enumerate_error(e))?;
            if !file_type.is_symlink() {
                debug!(entry = name, "Skipping entry that is not a symlink");
                continue;
            }

            match Self::probe(&entry.path()) {
                Ok(device) => {
                    debug!(entry = name, device = %device, "Found USB device");
                    devices.push(device);
                }
                Err(e) if self.mode == DiscoveryMode::BestEffort => {
                    warn!(entry = name, error = %e, "Skipping unreadable USB device");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(devices)
    }

    /// Resolve a device link to its node and read its attributes.
    fn probe(link: &Path) -> Result<UsbDevice, SysfsError> {
        let node = std::fs::canonicalize(link).map_err(|source| SysfsError::Resolve {
            link: link.to_path_buf(),
            source,
        })?;

        let mut device = UsbDevice::new(node);
        device.populate()?;
        Ok(device)
    }

    fn enumerate_error(&self, source: std::io::Error) -> SysfsError {
        SysfsError::Enumerate {
            path: self.base_path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_link_matches_ports() {
        assert!(is_device_link("1-1"));
        assert!(is_device_link("1-1.2"));
        assert!(is_device_link("3-10"));
        assert!(is_device_link("12-4.11"));
    }

    #[test]
    fn test_device_link_rejects_nested_ports() {
        assert!(!is_device_link("1-1.2.3"));
    }

    #[test]
    fn test_device_link_rejects_non_devices() {
        assert!(!is_device_link("1-1:1.0"));
        assert!(!is_device_link("usb1"));
        assert!(!is_device_link("hub"));
        assert!(!is_device_link("3"));
        assert!(!is_device_link("1-"));
        assert!(!is_device_link("1-1."));
        assert!(!is_device_link(""));
    }

    #[test]
    fn test_default_discovery() {
        let discovery = SysfsDiscovery::new();
        assert_eq!(discovery.base_path(), Path::new(SYSFS_USB_DEVICES));
        assert_eq!(discovery.mode(), DiscoveryMode::Strict);

        let discovery = discovery.with_mode(DiscoveryMode::BestEffort);
        assert_eq!(discovery.mode(), DiscoveryMode::BestEffort);
    }
}
