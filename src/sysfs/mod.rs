//! Sysfs access for USB device discovery.

pub mod discovery;

pub use discovery::{DiscoveryMode, SYSFS_USB_DEVICES, SysfsDiscovery, SysfsError, is_device_link};
