//! Asset provisioning
//!
//! Copies the configured asset files into the storage directory as an
//! explicit async job with one observable outcome per file. A failed
//! copy surfaces in the returned report instead of disappearing into a
//! detached thread.

use crate::config::AssetSettings;
use crate::context::AppContext;
use std::fmt;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

/// What happened to one asset file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// Copied to the storage directory
    Copied {
        /// Bytes written
        bytes: u64,
    },
    /// Destination already existed and overwrite is off
    AlreadyPresent,
    /// Copy failed
    Failed {
        /// Underlying error description
        reason: String,
    },
}

/// Per-file provisioning result
#[derive(Debug, Clone)]
pub struct AssetReport {
    /// Bare file name as configured
    pub file: String,
    pub outcome: AssetOutcome,
}

impl AssetReport {
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, AssetOutcome::Failed { .. })
    }
}

impl fmt::Display for AssetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AssetOutcome::Copied { bytes } => {
                write!(f, "{}: copied ({} bytes)", self.file, bytes)
            }
            AssetOutcome::AlreadyPresent => write!(f, "{}: already present", self.file),
            AssetOutcome::Failed { reason } => write!(f, "{}: failed: {}", self.file, reason),
        }
    }
}

/// Provision the configured asset files into the storage directory
///
/// Spawns one copy task per file and waits for all of them, returning
/// one report per configured file in configuration order. Only setup
/// failures (no source directory, storage directory not creatable) are
/// errors; per-file failures are reported as outcomes.
pub async fn provision_assets(
    ctx: &AppContext,
    settings: &AssetSettings,
) -> common::Result<Vec<AssetReport>> {
    if settings.files.is_empty() {
        debug!("no asset files configured");
        return Ok(Vec::new());
    }

    let Some(source_dir) = settings.source_dir.clone() else {
        return Err(common::Error::Assets(
            "asset files configured without a source directory".to_string(),
        ));
    };

    fs::create_dir_all(&ctx.storage_dir).await?;

    let mut handles = Vec::with_capacity(settings.files.len());
    for file in &settings.files {
        let from = source_dir.join(file);
        let to = ctx.storage_dir.join(file);
        let name = file.clone();
        let overwrite = settings.overwrite;

        handles.push(tokio::spawn(async move {
            AssetReport {
                outcome: copy_one(&from, &to, overwrite).await,
                file: name,
            }
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        let report = handle
            .await
            .map_err(|e| common::Error::Assets(format!("copy task panicked: {}", e)))?;

        match &report.outcome {
            AssetOutcome::Failed { reason } => {
                warn!("asset {} failed: {}", report.file, reason);
            }
            outcome => debug!("asset {}: {:?}", report.file, outcome),
        }
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| !r.succeeded()).count();
    info!(
        "provisioned {}/{} asset(s) into {} at {}",
        reports.len() - failed,
        reports.len(),
        ctx.storage_dir.display(),
        ctx.current_time_hhmm()
    );

    Ok(reports)
}

/// Copy one file, honoring copy-if-absent semantics
async fn copy_one(from: &Path, to: &Path, overwrite: bool) -> AssetOutcome {
    if !overwrite {
        match fs::try_exists(to).await {
            Ok(true) => return AssetOutcome::AlreadyPresent,
            Ok(false) => {}
            Err(e) => {
                return AssetOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }
    }

    match fs::copy(from, to).await {
        Ok(bytes) => AssetOutcome::Copied { bytes },
        Err(e) => AssetOutcome::Failed {
            reason: e.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProbeConfig;
    use std::path::PathBuf;

    fn test_context(storage_dir: PathBuf) -> AppContext {
        let mut config = ProbeConfig::default();
        config.storage.dir = storage_dir;
        AppContext::from_config(&config)
    }

    fn settings(source_dir: PathBuf, files: &[&str], overwrite: bool) -> AssetSettings {
        AssetSettings {
            source_dir: Some(source_dir),
            files: files.iter().map(|s| s.to_string()).collect(),
            overwrite,
        }
    }

    #[tokio::test]
    async fn test_copies_missing_files() {
        let source = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("input.bin"), b"payload").unwrap();

        let ctx = test_context(storage.path().join("assets"));
        let settings = settings(source.path().to_path_buf(), &["input.bin"], false);

        let reports = provision_assets(&ctx, &settings).await.unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, AssetOutcome::Copied { bytes: 7 });
        assert_eq!(
            std::fs::read(ctx.storage_dir.join("input.bin")).unwrap(),
            b"payload"
        );
    }

    #[tokio::test]
    async fn test_existing_destination_left_untouched() {
        let source = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("input.bin"), b"new").unwrap();
        std::fs::write(storage.path().join("input.bin"), b"old").unwrap();

        let ctx = test_context(storage.path().to_path_buf());
        let settings = settings(source.path().to_path_buf(), &["input.bin"], false);

        let reports = provision_assets(&ctx, &settings).await.unwrap();
        assert_eq!(reports[0].outcome, AssetOutcome::AlreadyPresent);
        assert_eq!(
            std::fs::read(storage.path().join("input.bin")).unwrap(),
            b"old"
        );
    }

    #[tokio::test]
    async fn test_overwrite_replaces_destination() {
        let source = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("input.bin"), b"new").unwrap();
        std::fs::write(storage.path().join("input.bin"), b"old").unwrap();

        let ctx = test_context(storage.path().to_path_buf());
        let settings = settings(source.path().to_path_buf(), &["input.bin"], true);

        let reports = provision_assets(&ctx, &settings).await.unwrap();
        assert_eq!(reports[0].outcome, AssetOutcome::Copied { bytes: 3 });
        assert_eq!(
            std::fs::read(storage.path().join("input.bin")).unwrap(),
            b"new"
        );
    }

    #[tokio::test]
    async fn test_missing_source_reported_per_file() {
        let source = tempfile::tempdir().unwrap();
        let storage = tempfile::tempdir().unwrap();
        std::fs::write(source.path().join("present.bin"), b"ok").unwrap();

        let ctx = test_context(storage.path().to_path_buf());
        let settings = settings(
            source.path().to_path_buf(),
            &["present.bin", "missing.bin"],
            false,
        );

        let reports = provision_assets(&ctx, &settings).await.unwrap();
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().any(|r| r.file == "present.bin" && r.succeeded()));
        assert!(
            reports
                .iter()
                .any(|r| r.file == "missing.bin" && !r.succeeded())
        );
    }

    #[tokio::test]
    async fn test_no_files_is_empty_report() {
        let storage = tempfile::tempdir().unwrap();
        let ctx = test_context(storage.path().to_path_buf());

        let reports = provision_assets(&ctx, &AssetSettings::default()).await.unwrap();
        assert!(reports.is_empty());
    }

    #[tokio::test]
    async fn test_files_without_source_dir_is_error() {
        let storage = tempfile::tempdir().unwrap();
        let ctx = test_context(storage.path().to_path_buf());

        let settings = AssetSettings {
            source_dir: None,
            files: vec!["input.bin".to_string()],
            overwrite: false,
        };

        assert!(provision_assets(&ctx, &settings).await.is_err());
    }

    #[test]
    fn test_report_display() {
        let report = AssetReport {
            file: "input.bin".to_string(),
            outcome: AssetOutcome::Copied { bytes: 42 },
        };
        assert_eq!(report.to_string(), "input.bin: copied (42 bytes)");

        let report = AssetReport {
            file: "input.bin".to_string(),
            outcome: AssetOutcome::AlreadyPresent,
        };
        assert_eq!(report.to_string(), "input.bin: already present");
    }
}
