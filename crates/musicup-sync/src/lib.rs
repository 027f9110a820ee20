//! music-upload sync - getting local files to the upload client
//!
//! Provides:
//! - A recursive scanner that lists every regular file under a directory
//! - A `notify`-based watcher that reports newly created paths
//! - The event handler applying the upload and delete-after-upload policy
//!
//! ## Modules
//!
//! - [`handler`] - [`EventHandler`](handler::EventHandler), initial scan and per-event uploads
//! - [`scanner`] - recursive enumeration of regular files
//! - [`watcher`] - [`FileWatcher`](watcher::FileWatcher) and [`ChangeEvent`](watcher::ChangeEvent)

pub mod handler;
pub mod scanner;
pub mod watcher;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while walking the local tree
#[derive(Debug, Error)]
pub enum SyncError {
    /// An I/O error occurred while reading the filesystem
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The directory to scan does not exist or is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}
