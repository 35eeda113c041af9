//! A single USB device and its identity attributes.

use crate::sysfs::SysfsError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Characters stripped from both ends of a raw attribute value.
const ATTR_TRIM: &[char] = &['\n', ' '];

/// Placeholder used when a device reports neither manufacturer nor product.
const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// A USB device backed by a sysfs device node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsbDevice {
    node: PathBuf,
    vendor_id: String,
    product_id: String,
    manufacturer: String,
    product: String,
}

impl UsbDevice {
    /// Create an unpopulated device rooted at a resolved sysfs node.
    pub fn new(node: impl Into<PathBuf>) -> Self {
        Self {
            node: node.into(),
            vendor_id: String::new(),
            product_id: String::new(),
            manufacturer: String::new(),
            product: String::new(),
        }
    }

    /// Read the identity attributes from the device node.
    ///
    /// `idVendor` and `idProduct` are mandatory and any failure reading them is
    /// returned. `manufacturer` and `product` fall back to an empty string.
    /// On error the device is left partially populated and should be dropped.
    pub fn populate(&mut self) -> Result<(), SysfsError> {
        self.vendor_id = read_required_attr(&self.node, "idVendor")?;
        self.product_id = read_required_attr(&self.node, "idProduct")?;
        self.manufacturer = read_attr(&self.node, "manufacturer").unwrap_or_default();
        self.product = read_attr(&self.node, "product").unwrap_or_default();
        Ok(())
    }

    /// Canonical sysfs node path.
    pub fn node(&self) -> &Path {
        &self.node
    }

    pub fn vendor_id(&self) -> &str {
        &self.vendor_id
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Manufacturer string, empty when the device does not report one.
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    /// Product string, empty when the device does not report one.
    pub fn product(&self) -> &str {
        &self.product
    }

    /// VID:PID string as reported by sysfs (e.g. "046d:c52b").
    pub fn vid_pid(&self) -> String {
        format!("{}:{}", self.vendor_id, self.product_id)
    }

    /// Manufacturer and product joined by a space, or "Unknown" if both are empty.
    pub fn description(&self) -> String {
        let mut desc = self.manufacturer.clone();
        if !self.product.is_empty() {
            desc.push(' ');
            desc.push_str(&self.product);
        }
        let desc = desc.trim_matches(' ');
        if desc.is_empty() {
            UNKNOWN_DESCRIPTION.to_string()
        } else {
            desc.to_string()
        }
    }
}

impl fmt::Display for UsbDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.vid_pid(), self.description())
    }
}

fn read_attr(node: &Path, attr: &str) -> std::io::Result<String> {
    let content = std::fs::read_to_string(node.join(attr))?;
    Ok(content.trim_matches(ATTR_TRIM).to_string())
}

fn read_required_attr(node: &Path, attr: &'static str) -> Result<String, SysfsError> {
    read_attr(node, attr).map_err(|source| SysfsError::Attribute {
        node: node.to_path_buf(),
        attr,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn device_with(vendor: &str, product: &str, manufacturer: &str, name: &str) -> UsbDevice {
        UsbDevice {
            node: PathBuf::from("/sys/devices/fake/1-1"),
            vendor_id: vendor.to_string(),
            product_id: product.to_string(),
            manufacturer: manufacturer.to_string(),
            product: name.to_string(),
        }
    }

    #[test]
    fn test_display_with_names() {
        let dev = device_with("046d", "c52b", "Acme", "Widget");
        assert_eq!(dev.to_string(), "046d:c52b Acme Widget");
    }

    #[test]
    fn test_display_unknown() {
        let dev = device_with("1d6b", "0002", "", "");
        assert_eq!(dev.to_string(), "1d6b:0002 Unknown");
    }

    #[test]
    fn test_display_single_name() {
        assert_eq!(
            device_with("0bda", "8153", "", "USB Ethernet").to_string(),
            "0bda:8153 USB Ethernet"
        );
        assert_eq!(
            device_with("0bda", "8153", "Realtek", "").to_string(),
            "0bda:8153 Realtek"
        );
    }

    #[test]
    fn test_populate_trims_values() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idVendor"), "046d\n").unwrap();
        fs::write(dir.path().join("idProduct"), " c52b \n").unwrap();
        fs::write(dir.path().join("manufacturer"), "Logitech\n").unwrap();
        fs::write(dir.path().join("product"), "USB Receiver\n").unwrap();

        let mut dev = UsbDevice::new(dir.path());
        dev.populate().unwrap();

        assert_eq!(dev.vendor_id(), "046d");
        assert_eq!(dev.product_id(), "c52b");
        assert_eq!(dev.manufacturer(), "Logitech");
        assert_eq!(dev.product(), "USB Receiver");
        assert_eq!(dev.node(), dir.path());
        assert_eq!(dev.to_string(), "046d:c52b Logitech USB Receiver");
    }

    #[test]
    fn test_populate_only_trims_spaces_and_newlines() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idVendor"), "\t046d\n").unwrap();
        fs::write(dir.path().join("idProduct"), "c52b").unwrap();

        let mut dev = UsbDevice::new(dir.path());
        dev.populate().unwrap();

        assert_eq!(dev.vendor_id(), "\t046d");
    }

    #[test]
    fn test_populate_optional_missing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idVendor"), "1d6b\n").unwrap();
        fs::write(dir.path().join("idProduct"), "0003\n").unwrap();

        let mut dev = UsbDevice::new(dir.path());
        dev.populate().unwrap();

        assert_eq!(dev.manufacturer(), "");
        assert_eq!(dev.product(), "");
        assert_eq!(dev.to_string(), "1d6b:0003 Unknown");
    }

    #[test]
    fn test_populate_missing_vendor() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idProduct"), "0003\n").unwrap();

        let mut dev = UsbDevice::new(dir.path());
        let err = dev.populate().unwrap_err();
        assert!(matches!(err, SysfsError::Attribute { attr: "idVendor", .. }));
    }

    #[test]
    fn test_populate_missing_product_id() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("idVendor"), "1d6b\n").unwrap();
        fs::write(dir.path().join("manufacturer"), "Linux\n").unwrap();

        let mut dev = UsbDevice::new(dir.path());
        let err = dev.populate().unwrap_err();
        assert!(matches!(err, SysfsError::Attribute { attr: "idProduct", .. }));
    }
}
