//! usb-storage-probe
//!
//! Host-side probe that reports whether a plain USB mass storage stick
//! is attached, judged by interface descriptors alone. Optionally
//! provisions bundled asset files into the storage directory.

mod assets;
mod config;
mod context;
mod usb;

use anyhow::{Context as _, Result};
use clap::Parser;
use common::{DeviceSource, any_mass_storage_attached, is_mass_storage, setup_logging};
use config::ProbeConfig;
use context::AppContext;
use tracing::{info, warn};
use usb::HostDeviceSource;

#[derive(Parser, Debug)]
#[command(name = "usb-storage-probe")]
#[command(
    author,
    version,
    about = "Classify attached USB devices as mass storage"
)]
#[command(long_about = "
Enumerates the USB devices attached to this host and classifies each by
its interface descriptors. A device counts as mass storage only when it
exposes a single interface carrying the SCSI transparent command set
over bulk-only transport.

EXAMPLES:
    # Report whether any mass storage stick is attached
    usb-storage-probe

    # Show every device with its interfaces and classification
    usb-storage-probe --list-devices

    # Copy the configured asset files into the storage directory
    usb-storage-probe --provision

    # Run with debug logging
    usb-storage-probe --log-level debug

CONFIGURATION:
    The probe looks for configuration files in the following order:
    1. Path specified with --config
    2. ~/.config/usb-storage-probe/probe.toml
    3. /etc/usb-storage-probe/probe.toml
    4. Built-in defaults

EXIT STATUS:
    0 when a mass storage device is attached, 1 otherwise.
")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<std::path::PathBuf>,

    /// Save default configuration to default location and exit
    #[arg(long)]
    save_config: bool,

    /// List USB devices with their classification and exit
    #[arg(long)]
    list_devices: bool,

    /// Provision the configured asset files before probing
    #[arg(long)]
    provision: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --save-config flag early (before loading config)
    if args.save_config {
        let config = ProbeConfig::default();
        let path = ProbeConfig::default_path();
        config.save(&path).context("Failed to save configuration")?;
        println!("Configuration saved to: {}", path.display());
        return Ok(());
    }

    // Load configuration first (to get log level from config if not specified)
    let config = if let Some(ref path) = args.config {
        ProbeConfig::load(Some(path.clone())).context("Failed to load configuration")?
    } else {
        ProbeConfig::load_or_default()
    };

    // Use CLI log level if specified, otherwise use config value
    let log_level = args.log_level.as_deref().unwrap_or(&config.probe.log_level);

    setup_logging(log_level).context("Failed to setup logging")?;

    let ctx = AppContext::from_config(&config);
    info!(
        "usb-storage-probe v{} (channel {}, unit {})",
        ctx.version, ctx.channel, ctx.unit_id
    );

    if args.provision {
        let reports = assets::provision_assets(&ctx, &config.assets)
            .await
            .context("Failed to provision assets")?;
        for report in &reports {
            println!("{}", report);
        }
    }

    if args.list_devices {
        return list_devices_mode();
    }

    if !probe_mode() {
        std::process::exit(1);
    }
    Ok(())
}

/// One-shot probe: is any mass storage device attached?
///
/// An unavailable enumeration source is a definite "no" with a
/// diagnostic, matching the classifier's degraded path.
fn probe_mode() -> bool {
    let attached = match HostDeviceSource::new() {
        Ok(source) => any_mass_storage_attached(&source),
        Err(e) => {
            warn!("usb enumeration unavailable: {}", e);
            false
        }
    };

    if attached {
        println!("mass storage attached");
    } else {
        println!("no mass storage attached");
    }
    attached
}

/// List USB devices with their interfaces and classification
fn list_devices_mode() -> Result<()> {
    let source = HostDeviceSource::new().context("Failed to initialize USB enumeration")?;
    let devices = source.list_devices().context("Failed to list USB devices")?;

    if devices.is_empty() {
        println!("No USB devices found.");
        return Ok(());
    }

    let mut keys: Vec<_> = devices.keys().copied().collect();
    keys.sort_by_key(|k| (k.bus, k.address));

    println!("Found {} USB device(s):\n", devices.len());
    for key in keys {
        let device = &devices[&key];
        println!("  [{}] {:04x}:{:04x}", key, device.vendor_id, device.product_id);
        if device.interfaces.is_empty() {
            println!("      no interfaces");
        }
        for (index, iface) in device.interfaces.iter().enumerate() {
            println!("      interface {}: {}", index, iface);
        }
        println!(
            "      mass storage: {}",
            if is_mass_storage(Some(device)) {
                "yes"
            } else {
                "no"
            }
        );
        println!();
    }

    Ok(())
}
