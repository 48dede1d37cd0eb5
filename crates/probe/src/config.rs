//! Probe configuration management

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    pub probe: ProbeSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeSettings {
    /// Default log level, overridable from the command line
    #[serde(default = "ProbeSettings::default_log_level")]
    pub log_level: String,
    /// Distribution channel identifier
    #[serde(default = "ProbeSettings::default_channel")]
    pub channel: String,
    /// Head unit identifier; a fixed placeholder is used when unset
    #[serde(default)]
    pub unit_id: Option<String>,
    /// Timezone offset in hours from UTC, used for report timestamps
    #[serde(default)]
    pub timezone_offset_hours: i32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            channel: Self::default_channel(),
            unit_id: None,
            timezone_offset_hours: 0,
        }
    }
}

impl ProbeSettings {
    fn default_log_level() -> String {
        "info".to_string()
    }

    fn default_channel() -> String {
        "default".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Directory that provisioned assets are written into
    #[serde(default = "StorageSettings::default_dir")]
    pub dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: Self::default_dir(),
        }
    }
}

impl StorageSettings {
    fn default_dir() -> PathBuf {
        if let Some(data_dir) = dirs::data_local_dir() {
            data_dir.join("usb-storage-probe")
        } else {
            PathBuf::from("/var/lib/usb-storage-probe")
        }
    }
}

/// Asset provisioning configuration
///
/// Files listed here are copied from `source_dir` into the storage
/// directory. Existing destinations are left untouched unless
/// `overwrite` is set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AssetSettings {
    /// Directory holding the bundled asset files
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    /// Bare file names to provision (no path separators)
    #[serde(default)]
    pub files: Vec<String>,
    /// Replace an existing destination file
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            probe: ProbeSettings::default(),
            storage: StorageSettings::default(),
            assets: AssetSettings::default(),
        }
    }
}

impl ProbeConfig {
    /// Load configuration from the specified path
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p
        } else {
            // Try standard locations in order
            let candidates = vec![
                Self::default_path(),
                PathBuf::from("/etc/usb-storage-probe/probe.toml"),
            ];

            candidates
                .into_iter()
                .find(|p| p.exists())
                .ok_or_else(|| anyhow!("No configuration file found, using defaults"))?
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: ProbeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        config.expand_paths();
        config.validate()?;

        tracing::info!("Loaded configuration from: {}", config_path.display());
        Ok(config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default() -> Self {
        match Self::load(None) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("usb-storage-probe").join("probe.toml")
        } else {
            PathBuf::from(".config/usb-storage-probe/probe.toml")
        }
    }

    /// Expand `~` in user-supplied paths
    fn expand_paths(&mut self) {
        self.storage.dir = expand_tilde(&self.storage.dir);
        if let Some(ref source_dir) = self.assets.source_dir {
            self.assets.source_dir = Some(expand_tilde(source_dir));
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        // Validate log level
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.probe.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.probe.log_level,
                valid_levels.join(", ")
            ));
        }

        // Asset files are bare names resolved against source_dir
        for file in &self.assets.files {
            Self::validate_asset_name(file)?;
        }

        if !self.assets.files.is_empty() && self.assets.source_dir.is_none() {
            return Err(anyhow!(
                "Asset files configured but assets.source_dir is not set"
            ));
        }

        Ok(())
    }

    /// Validate an asset file name
    fn validate_asset_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(anyhow!("Empty asset file name"));
        }

        if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
            return Err(anyhow!(
                "Invalid asset file name '{}', must be a bare file name",
                name
            ));
        }

        Ok(())
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
