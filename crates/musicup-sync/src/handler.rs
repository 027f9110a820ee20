//! Upload handling for scanned and newly created paths
//!
//! The [`EventHandler`] turns paths into upload calls and applies the
//! delete-after-upload policy. It is stateless across calls: everything it
//! needs is fixed in the [`HandlerConfig`] it is built with.
//!
//! Per-file failures never abort a run. Rejected uploads, unreadable
//! directories and failed deletions are logged and counted in the returned
//! [`UploadReport`], and processing moves on to the next file.
//!
//! A multi-file run (the initial scan or a created directory) checks the
//! shutdown token between files. The upload in flight when it fires still
//! completes, deletion included; the remaining files are left untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use musicup_core::{
    domain::{UploadStatus, UploadTarget},
    ports::UploadClient,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::scanner;
use crate::watcher::ChangeEvent;

// ============================================================================
// HandlerConfig
// ============================================================================

/// Immutable configuration of an [`EventHandler`]
#[derive(Clone)]
pub struct HandlerConfig {
    /// Authenticated upload client shared with the daemon
    pub client: Arc<dyn UploadClient>,
    /// Root of the watched tree, scanned by [`EventHandler::initial_scan`]
    pub root: PathBuf,
    /// Delete local files once the service holds them
    pub remove: bool,
    /// Ask the service to transcode
    pub transcode: bool,
    /// Cancelled on daemon shutdown; stops multi-file runs between files
    pub shutdown: CancellationToken,
}

impl std::fmt::Debug for HandlerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerConfig")
            .field("root", &self.root)
            .field("remove", &self.remove)
            .field("transcode", &self.transcode)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// UploadReport
// ============================================================================

/// Tally of one scan or one handled event
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Files newly transferred to the service
    pub files_uploaded: u32,
    /// Files the service already had
    pub files_matched: u32,
    /// Files the service did not accept
    pub files_rejected: u32,
    /// Local files removed after upload or match
    pub files_deleted: u32,
    /// Local filesystem errors encountered (non-fatal)
    pub errors: Vec<String>,
    /// The run stopped early because shutdown was requested
    pub interrupted: bool,
}

impl UploadReport {
    /// Number of files passed to the upload client
    pub fn files_attempted(&self) -> u32 {
        self.files_uploaded + self.files_matched + self.files_rejected
    }
}

// ============================================================================
// EventHandler
// ============================================================================

/// Uploads files found by the initial scan or reported by the watcher
#[derive(Debug, Clone)]
pub struct EventHandler {
    config: HandlerConfig,
}

impl EventHandler {
    pub fn new(config: HandlerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Uploads every regular file under the configured root
    pub async fn initial_scan(&self) -> UploadReport {
        info!(root = %self.config.root.display(), "Uploading existing files");
        let report = self.upload_tree(&self.config.root).await;
        info!(
            attempted = report.files_attempted(),
            uploaded = report.files_uploaded,
            matched = report.files_matched,
            rejected = report.files_rejected,
            deleted = report.files_deleted,
            interrupted = report.interrupted,
            "Initial scan complete"
        );
        report
    }

    /// Handles one watcher event
    ///
    /// A created directory uploads every regular file beneath it; anything
    /// else is uploaded as a single file. The directory itself is never
    /// handed to the client. Hidden paths are ignored, as in the scan.
    pub async fn handle(&self, event: &ChangeEvent) -> UploadReport {
        if scanner::is_hidden_within(&self.config.root, event.path()) {
            debug!(path = %event.path().display(), "Ignoring hidden path");
            return UploadReport::default();
        }

        info!(path = %event.path().display(), "Detected new files");

        let target = match inspect(event.path()).await {
            Ok(target) => target,
            Err(err) => {
                warn!(
                    path = %event.path().display(),
                    error = %err,
                    "Created path is no longer accessible, skipping"
                );
                return UploadReport {
                    errors: vec![format!("{}: {err}", event.path().display())],
                    ..UploadReport::default()
                };
            }
        };

        if target.is_directory() {
            self.upload_tree(target.path()).await
        } else {
            let mut report = UploadReport::default();
            self.upload_file(target.path(), &mut report).await;
            report
        }
    }

    async fn upload_tree(&self, dir: &Path) -> UploadReport {
        let files = match scanner::collect_files(dir).await {
            Ok(files) => files,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "Cannot enumerate directory");
                return UploadReport {
                    errors: vec![format!("{}: {err}", dir.display())],
                    ..UploadReport::default()
                };
            }
        };

        let mut report = UploadReport::default();
        for (done, file) in files.iter().enumerate() {
            if self.config.shutdown.is_cancelled() {
                info!(
                    path = %dir.display(),
                    remaining = files.len() - done,
                    "Shutdown requested, leaving remaining files"
                );
                report.interrupted = true;
                break;
            }
            self.upload_file(file, &mut report).await;
        }
        report
    }

    async fn upload_file(&self, path: &Path, report: &mut UploadReport) {
        info!(path = %path.display(), "Uploading");

        let outcome = self.config.client.upload(path, self.config.transcode).await;

        match outcome.status() {
            UploadStatus::Uploaded => {
                report.files_uploaded += 1;
                info!(path = %path.display(), "Uploaded");
            }
            UploadStatus::Matched => {
                report.files_matched += 1;
                info!(path = %path.display(), "Already in library (matched)");
            }
            UploadStatus::NotUploaded => {
                report.files_rejected += 1;
                warn!(path = %path.display(), reason = outcome.reason(), "Not uploaded");
            }
        }

        if !outcome.permits_deletion(self.config.remove) {
            return;
        }

        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                report.files_deleted += 1;
                info!(path = %path.display(), "Deleted local file");
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "Failed to delete local file");
                report.errors.push(format!("{}: {err}", path.display()));
            }
        }
    }
}

/// Stats `path` (following symlinks) without blocking the runtime
async fn inspect(path: &Path) -> std::io::Result<UploadTarget> {
    let metadata = tokio::fs::metadata(path).await?;
    debug!(path = %path.display(), is_dir = metadata.is_dir(), "Inspected created path");
    Ok(UploadTarget::from_metadata(path, &metadata))
}
