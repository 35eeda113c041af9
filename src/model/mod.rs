//! USB data model types.

pub mod device;

pub use device::UsbDevice;
