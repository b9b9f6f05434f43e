use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::fs;
use tokio::time::interval;

/// Outcome of one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub retained: usize,
    pub failed: usize,
}

/// Deletes staged files older than the retention window from one directory.
///
/// Only wall-clock age is considered. A file younger than the window is never
/// touched; per-file failures are logged and the sweep moves on.
#[derive(Debug, Clone)]
pub struct RetentionSweeper {
    dir: PathBuf,
    retention_window: Duration,
    sweep_interval: Duration,
}

impl RetentionSweeper {
    pub fn new(dir: impl Into<PathBuf>, retention_window: Duration, sweep_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            retention_window,
            sweep_interval,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Start the background sweep loop.
    /// Returns a JoinHandle so the caller can stop it on shutdown.
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut sweep_interval = interval(self.sweep_interval);

            loop {
                sweep_interval.tick().await;

                tracing::info!(dir = %self.dir.display(), "Starting scheduled retention sweep");

                if let Err(e) = self.sweep().await {
                    tracing::error!(error = %e, dir = %self.dir.display(), "Retention sweep failed");
                }
            }
        })
    }

    pub async fn sweep(&self) -> io::Result<SweepReport> {
        self.sweep_at(SystemTime::now()).await
    }

    /// Sweep as if the current time were `now`.
    #[tracing::instrument(skip(self, now), fields(dir = %self.dir.display(), window_secs = self.retention_window.as_secs()))]
    pub async fn sweep_at(&self, now: SystemTime) -> io::Result<SweepReport> {
        let mut report = SweepReport::default();

        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Staging directory does not exist yet, nothing to sweep");
                return Ok(report);
            }
            Err(e) => return Err(e),
        };

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read staging directory entry");
                    report.failed += 1;
                    break;
                }
            };
            let path = entry.path();

            let metadata = match entry.metadata().await {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to stat staged file");
                    report.failed += 1;
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            report.scanned += 1;

            let modified = match metadata.modified() {
                Ok(modified) => modified,
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Staged file has no modification time");
                    report.failed += 1;
                    continue;
                }
            };

            // Files stamped in the future have age zero.
            let age = now.duration_since(modified).unwrap_or(Duration::ZERO);
            if age <= self.retention_window {
                report.retained += 1;
                continue;
            }

            match fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), age_secs = age.as_secs(), "Deleted expired staged file");
                    report.deleted += 1;
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    report.deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(error = %e, path = %path.display(), "Failed to delete expired staged file");
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            deleted = report.deleted,
            retained = report.retained,
            failed = report.failed,
            "Retention sweep completed"
        );

        Ok(report)
    }
}
