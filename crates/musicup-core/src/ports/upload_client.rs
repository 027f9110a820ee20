//! Upload client port (driven/secondary port)
//!
//! Defines the interface the daemon uses to talk to the remote music
//! library. The shipped implementation is the HTTP adapter in
//! `musicup-client`; tests substitute in-memory recorders.
//!
//! ## Design Notes
//!
//! - Failures never cross this boundary as errors. `login` reports a plain
//!   `bool` and `upload` folds transport and service failures into
//!   [`UploadOutcome::not_uploaded`], so callers only decide between "stop"
//!   (login) and "log and continue" (upload).
//! - One attempt per call. Implementations must not retry.
//! - `login` takes `&mut self` because it is called once, before the client
//!   is shared behind an `Arc` with the scanner and the event handler.

use std::path::Path;

use crate::domain::{UploadOutcome, UploaderId};

/// Port trait for the remote music-library service
#[async_trait::async_trait]
pub trait UploadClient: Send + Sync {
    /// Authenticates with the credential file at `credentials`, registering
    /// this device as `uploader_id`
    ///
    /// Returns `false` when the credentials are invalid or unreadable.
    async fn login(&mut self, credentials: &Path, uploader_id: &UploaderId) -> bool;

    /// Uploads one file, optionally asking the service to transcode it
    ///
    /// May take as long as the transfer does. Any timeout belongs to the
    /// adapter; there is no retry at this level.
    async fn upload(&self, path: &Path, transcode: bool) -> UploadOutcome;
}
