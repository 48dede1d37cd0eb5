//! USB descriptor type definitions
//!
//! This module defines the descriptor snapshot types produced by an
//! enumeration source: device identity, vendor/product identification,
//! and per-interface class codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// USB base class code for mass storage devices.
pub const MASS_STORAGE_CLASS: u8 = 0x08;

/// Mass storage subclass code for the SCSI transparent command set.
pub const SCSI_TRANSPARENT_SUBCLASS: u8 = 0x06;

/// Mass storage protocol code for bulk-only transport.
pub const BULK_ONLY_PROTOCOL: u8 = 0x50;

/// Device identity on the host bus
///
/// Bus number plus device address, stable for as long as the device
/// stays connected. Used as the enumeration map key and in log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceKey {
    /// Bus number on the host
    pub bus: u8,
    /// Device address on the bus
    pub address: u8,
}

impl DeviceKey {
    pub fn new(bus: u8, address: u8) -> Self {
        Self { bus, address }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}:{:03}", self.bus, self.address)
    }
}

/// One functional interface of a device
///
/// Carries the three class codes that identify the interface's
/// function. Values are taken from the interface descriptor as
/// delivered by the enumeration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// Interface class code (bInterfaceClass)
    pub class: u8,
    /// Interface subclass code (bInterfaceSubClass)
    pub subclass: u8,
    /// Interface protocol code (bInterfaceProtocol)
    pub protocol: u8,
}

impl InterfaceDescriptor {
    pub fn new(class: u8, subclass: u8, protocol: u8) -> Self {
        Self {
            class,
            subclass,
            protocol,
        }
    }

    /// Whether this interface carries the mass storage bulk-only
    /// signature: SCSI transparent command set over bulk-only
    /// transport. Exact match on all three class codes.
    pub fn is_msc_bulk_only(&self) -> bool {
        self.class == MASS_STORAGE_CLASS
            && self.subclass == SCSI_TRANSPARENT_SUBCLASS
            && self.protocol == BULK_ONLY_PROTOCOL
    }
}

impl fmt::Display for InterfaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}/{:02x}/{:02x}",
            self.class, self.subclass, self.protocol
        )
    }
}

/// Snapshot of one enumerated device
///
/// Produced by the enumeration source per listing call. Vendor and
/// product IDs are carried for display and logging only; classification
/// looks exclusively at the interface list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device identity on the host bus
    pub key: DeviceKey,
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID
    pub product_id: u16,
    /// Interface descriptors of the active configuration, in order
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl DeviceDescriptor {
    pub fn new(key: DeviceKey, vendor_id: u16, product_id: u16) -> Self {
        Self {
            key,
            vendor_id,
            product_id,
            interfaces: Vec::new(),
        }
    }

    /// Number of interfaces in the active configuration
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// Interface descriptor at the given position, if present
    pub fn interface_at(&self, index: usize) -> Option<&InterfaceDescriptor> {
        self.interfaces.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_key_display() {
        let key = DeviceKey::new(1, 4);
        assert_eq!(key.to_string(), "001:004");

        let key = DeviceKey::new(255, 127);
        assert_eq!(key.to_string(), "255:127");
    }

    #[test]
    fn test_device_key_copy() {
        let key1 = DeviceKey::new(1, 2);
        let key2 = key1;
        assert_eq!(key1, key2);
    }

    #[test]
    fn test_msc_bulk_only_signature() {
        assert!(InterfaceDescriptor::new(0x08, 0x06, 0x50).is_msc_bulk_only());

        // Near misses on each field
        assert!(!InterfaceDescriptor::new(0x09, 0x06, 0x50).is_msc_bulk_only());
        assert!(!InterfaceDescriptor::new(0x08, 0x05, 0x50).is_msc_bulk_only());
        assert!(!InterfaceDescriptor::new(0x08, 0x06, 0x51).is_msc_bulk_only());
        assert!(!InterfaceDescriptor::new(0x00, 0x00, 0x00).is_msc_bulk_only());
    }

    #[test]
    fn test_interface_display() {
        let iface = InterfaceDescriptor::new(0x08, 0x06, 0x50);
        assert_eq!(iface.to_string(), "08/06/50");
    }

    #[test]
    fn test_descriptor_accessors() {
        let mut device = DeviceDescriptor::new(DeviceKey::new(1, 2), 0x0781, 0x5567);
        assert_eq!(device.interface_count(), 0);
        assert!(device.interface_at(0).is_none());

        device.interfaces.push(InterfaceDescriptor::new(8, 6, 0x50));
        assert_eq!(device.interface_count(), 1);
        assert!(device.interface_at(0).unwrap().is_msc_bulk_only());
    }
}
