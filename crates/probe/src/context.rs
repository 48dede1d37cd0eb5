//! Application context
//!
//! Caller-owned environment values, built once in `main` from the
//! loaded configuration and passed by reference to whichever component
//! needs them. There is no global instance and no lazy initialization.

use crate::config::ProbeConfig;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Placeholder unit identifier when none is configured
pub const DEFAULT_UNIT_ID: &str = "UNKNOWN_UNIT";

/// Environment values shared across the application
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Crate version baked in at build time
    pub version: &'static str,
    /// Distribution channel identifier
    pub channel: String,
    /// Head unit identifier
    pub unit_id: String,
    /// Directory that provisioned assets are written into
    pub storage_dir: PathBuf,
    /// Timezone offset in hours from UTC
    pub timezone_offset_hours: i32,
}

impl AppContext {
    /// Build the context from a loaded configuration
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            channel: config.probe.channel.clone(),
            unit_id: config
                .probe
                .unit_id
                .clone()
                .unwrap_or_else(|| DEFAULT_UNIT_ID.to_string()),
            storage_dir: config.storage.dir.clone(),
            timezone_offset_hours: config.probe.timezone_offset_hours,
        }
    }

    /// Wall-clock time as "HH:MM" with the configured offset applied
    pub fn current_time_hhmm(&self) -> String {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;

        let (hours, minutes) = hhmm_from_epoch(secs, self.timezone_offset_hours);
        format!("{:02}:{:02}", hours, minutes)
    }
}

/// Hours and minutes of the day for an epoch timestamp with offset
fn hhmm_from_epoch(epoch_secs: i64, offset_hours: i32) -> (u8, u8) {
    let secs_with_offset = epoch_secs + (offset_hours as i64 * 3600);

    let secs_today = secs_with_offset.rem_euclid(86400);
    let hours = (secs_today / 3600) as u8;
    let minutes = ((secs_today % 3600) / 60) as u8;

    (hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hhmm_from_epoch() {
        // 1970-01-01 00:00:00
        assert_eq!(hhmm_from_epoch(0, 0), (0, 0));
        // 12:34 on day one
        assert_eq!(hhmm_from_epoch(12 * 3600 + 34 * 60, 0), (12, 34));
        // Offset wraps forward past midnight
        assert_eq!(hhmm_from_epoch(23 * 3600, 2), (1, 0));
        // Negative offset wraps backward
        assert_eq!(hhmm_from_epoch(3600, -2), (23, 0));
    }

    #[test]
    fn test_context_from_config_defaults() {
        let config = ProbeConfig::default();
        let ctx = AppContext::from_config(&config);

        assert_eq!(ctx.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(ctx.channel, "default");
        assert_eq!(ctx.unit_id, DEFAULT_UNIT_ID);
        assert_eq!(ctx.timezone_offset_hours, 0);
    }

    #[test]
    fn test_context_uses_configured_unit_id() {
        let mut config = ProbeConfig::default();
        config.probe.unit_id = Some("unit-0042".to_string());

        let ctx = AppContext::from_config(&config);
        assert_eq!(ctx.unit_id, "unit-0042");
    }

    #[test]
    fn test_current_time_format() {
        let ctx = AppContext::from_config(&ProbeConfig::default());
        let formatted = ctx.current_time_hhmm();

        assert_eq!(formatted.len(), 5);
        assert_eq!(formatted.as_bytes()[2], b':');
    }
}
