//! Mass storage device classification
//!
//! Decides whether an enumerated USB device is a plain mass storage
//! stick: exactly one interface, carrying the SCSI transparent command
//! set over bulk-only transport (class 0x08, subclass 0x06, protocol
//! 0x50). Composite devices are refused outright, even when one of
//! their interfaces matches; the gate picks out single-function sticks
//! and treats anything ambiguous as not-storage.
//!
//! The predicates are stateless and hold no descriptor beyond the call,
//! so they are safe to invoke from any number of threads.

use descriptor::{DeviceDescriptor, DeviceKey};
use std::collections::HashMap;
use tracing::{debug, info, trace, warn};

/// Enumeration source contract
///
/// Lists the currently attached devices as read-only descriptor
/// snapshots keyed by device identity. Implementations only read
/// descriptors; they never open, claim, or talk to a device.
pub trait DeviceSource {
    /// Snapshot the currently attached devices
    fn list_devices(&self) -> crate::Result<HashMap<DeviceKey, DeviceDescriptor>>;
}

/// Classify one device as mass storage or not
///
/// `true` iff the device exposes exactly one interface and that
/// interface carries the bulk-only SCSI signature. An absent device is
/// an ordinary `false`, not an error.
pub fn is_mass_storage(device: Option<&DeviceDescriptor>) -> bool {
    let Some(device) = device else {
        debug!("no device to classify");
        return false;
    };

    // Exactly one interface. Zero or several means composite or
    // descriptor-less, and neither is a plain storage stick.
    let [iface] = device.interfaces.as_slice() else {
        trace!(
            "device {}: {} interfaces, not single-function",
            device.key,
            device.interface_count()
        );
        return false;
    };

    if iface.is_msc_bulk_only() {
        info!("device {} is mass storage ({})", device.key, iface);
        true
    } else {
        trace!("device {}: interface {} does not match", device.key, iface);
        false
    }
}

/// Whether any currently attached device classifies as mass storage
///
/// An unavailable enumeration source degrades to `false` with a
/// diagnostic; the failure is never propagated. Iteration order is
/// irrelevant since the predicate is pure, and the scan stops at the
/// first match.
pub fn any_mass_storage_attached(source: &impl DeviceSource) -> bool {
    let devices = match source.list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            warn!("no enumerable devices: {}", e);
            return false;
        }
    };

    trace!("classifying {} attached device(s)", devices.len());
    devices.values().any(|device| is_mass_storage(Some(device)))
}
