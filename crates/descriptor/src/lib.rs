//! Descriptor types for usb-storage-probe
//!
//! This crate defines the read-only descriptor snapshots exchanged
//! between the enumeration source and the classifier: device identity,
//! vendor/product identification, and interface class codes. It holds
//! no I/O and no state.
//!
//! # Example
//!
//! ```
//! use descriptor::{DeviceDescriptor, DeviceKey, InterfaceDescriptor};
//!
//! let mut device = DeviceDescriptor::new(DeviceKey::new(1, 4), 0x0781, 0x5567);
//! device.interfaces.push(InterfaceDescriptor::new(0x08, 0x06, 0x50));
//!
//! assert_eq!(device.interface_count(), 1);
//! assert!(device.interfaces[0].is_msc_bulk_only());
//! ```

pub mod types;

pub use types::{
    BULK_ONLY_PROTOCOL, DeviceDescriptor, DeviceKey, InterfaceDescriptor, MASS_STORAGE_CLASS,
    SCSI_TRANSPARENT_SUBCLASS,
};
