//! Host USB enumeration source
//!
//! rusb-backed implementation of the enumeration contract. Snapshots
//! the connected devices and their active-configuration interface
//! descriptors; never opens, claims, or talks to a device.

use common::DeviceSource;
use descriptor::{DeviceDescriptor, DeviceKey, InterfaceDescriptor};
use rusb::{Context, Device, UsbContext};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Enumeration source over the host's USB buses
pub struct HostDeviceSource {
    context: Context,
}

impl HostDeviceSource {
    /// Create the libusb context backing this source
    ///
    /// Failure here means the USB service itself is unavailable;
    /// callers treat that as "nothing enumerable" rather than a fatal
    /// condition.
    pub fn new() -> common::Result<Self> {
        let context = Context::new().map_err(|e| common::Error::Usb(e.to_string()))?;
        Ok(Self { context })
    }
}

impl DeviceSource for HostDeviceSource {
    fn list_devices(&self) -> common::Result<HashMap<DeviceKey, DeviceDescriptor>> {
        let devices = self
            .context
            .devices()
            .map_err(|e| common::Error::Usb(e.to_string()))?;

        let mut snapshot = HashMap::new();
        for device in devices.iter() {
            match read_device(&device) {
                Ok(descriptor) => {
                    snapshot.insert(descriptor.key, descriptor);
                }
                Err(e) => {
                    warn!(
                        "skipping device {:03}:{:03}: {}",
                        device.bus_number(),
                        device.address(),
                        e
                    );
                }
            }
        }

        debug!("enumerated {} device(s)", snapshot.len());
        Ok(snapshot)
    }
}

/// Read one device's descriptor snapshot
///
/// The interface list comes from the active configuration, one entry
/// per interface (its first alternate setting). A device whose
/// configuration cannot be read is carried with an empty interface
/// list, which classifies as not-storage.
fn read_device<T: UsbContext>(device: &Device<T>) -> Result<DeviceDescriptor, rusb::Error> {
    let key = DeviceKey::new(device.bus_number(), device.address());
    let device_desc = device.device_descriptor()?;

    let mut snapshot = DeviceDescriptor::new(key, device_desc.vendor_id(), device_desc.product_id());

    match device.active_config_descriptor() {
        Ok(config) => {
            for interface in config.interfaces() {
                if let Some(alt) = interface.descriptors().next() {
                    snapshot.interfaces.push(InterfaceDescriptor::new(
                        alt.class_code(),
                        alt.sub_class_code(),
                        alt.protocol_code(),
                    ));
                }
            }
        }
        Err(e) => {
            debug!("device {}: no readable configuration: {}", key, e);
        }
    }

    Ok(snapshot)
}
