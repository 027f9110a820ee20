//! Upload targets and outcomes
//!
//! An [`UploadTarget`] is a path discovered by the initial scan or by a
//! watch event. An [`UploadOutcome`] is what the remote service reported
//! for one upload attempt, and decides whether the local copy may be removed.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ============================================================================
// UploadTarget
// ============================================================================

/// A filesystem path scheduled for upload
///
/// Created transiently per discovered path and discarded right after the
/// upload attempt (and optional deletion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    path: PathBuf,
    is_directory: bool,
}

impl UploadTarget {
    /// Builds the target matching already-fetched metadata
    ///
    /// Pass metadata that follows symlinks, so a link to a directory is a
    /// directory target.
    pub fn from_metadata(path: impl Into<PathBuf>, metadata: &std::fs::Metadata) -> Self {
        Self {
            path: path.into(),
            is_directory: metadata.is_dir(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.is_directory
    }
}

// ============================================================================
// UploadOutcome
// ============================================================================

/// Coarse classification of an [`UploadOutcome`], mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    /// The file was transferred to the service
    Uploaded,
    /// The service already had an identical track
    Matched,
    /// Neither; see [`UploadOutcome::not_uploaded`]
    NotUploaded,
}

impl Display for UploadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStatus::Uploaded => "uploaded",
            UploadStatus::Matched => "matched",
            UploadStatus::NotUploaded => "not_uploaded",
        };
        write!(f, "{s}")
    }
}

/// Result of a single upload attempt
///
/// The three fields are independent as reported by the service. Local
/// deletion is allowed only when `uploaded || matched`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    /// The file was newly transferred
    pub uploaded: bool,
    /// The service already had an identical item
    pub matched: bool,
    /// Why the file was not uploaded, when neither of the above holds
    pub not_uploaded: Option<String>,
}

impl UploadOutcome {
    /// Outcome for a freshly transferred file
    #[must_use]
    pub fn uploaded() -> Self {
        Self {
            uploaded: true,
            ..Self::default()
        }
    }

    /// Outcome for a file the service already had
    #[must_use]
    pub fn matched() -> Self {
        Self {
            matched: true,
            ..Self::default()
        }
    }

    /// Outcome for a rejected or failed upload
    pub fn not_uploaded(reason: impl Into<String>) -> Self {
        Self {
            not_uploaded: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Whether the service holds the track after this attempt
    #[must_use]
    pub fn is_stored(&self) -> bool {
        self.uploaded || self.matched
    }

    /// Deletion policy: the local file is removed iff the service holds the
    /// track and the caller asked for removal
    #[must_use]
    pub fn permits_deletion(&self, deletion_requested: bool) -> bool {
        deletion_requested && self.is_stored()
    }

    #[must_use]
    pub fn status(&self) -> UploadStatus {
        if self.uploaded {
            UploadStatus::Uploaded
        } else if self.matched {
            UploadStatus::Matched
        } else {
            UploadStatus::NotUploaded
        }
    }

    /// Reason for a failed upload, falling back to a generic message
    #[must_use]
    pub fn reason(&self) -> &str {
        self.not_uploaded.as_deref().unwrap_or("no reason given")
    }
}
