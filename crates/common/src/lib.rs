//! Common utilities for usb-storage-probe
//!
//! This crate provides the functionality shared across the workspace:
//! the mass storage classifier and its enumeration-source contract,
//! error handling, and logging setup.

pub mod classifier;
pub mod error;
pub mod logging;

pub use classifier::{DeviceSource, any_mass_storage_attached, is_mass_storage};
pub use error::{Error, Result};
pub use logging::setup_logging;
