//! USB subsystem
//!
//! Host-side device enumeration for the classifier. Enumeration is a
//! one-shot, read-only snapshot of the currently attached devices;
//! there is no hot-plug handling and no transfer path.

pub mod host;

pub use host::HostDeviceSource;
