//! Filesystem watching
//!
//! [`FileWatcher`] wraps the `notify` crate to monitor a directory tree and
//! forwards creation events to the daemon as [`ChangeEvent`] values.
//!
//! ## Architecture
//!
//! ```text
//! inotify / kqueue
//!       │  (notify background thread)
//!       ▼
//!  FileWatcher  ──→  mpsc::channel  ──→  daemon task  ──→  EventHandler
//! ```
//!
//! Only creations are forwarded. Modifications, removals and renames of
//! files already present are intentionally not observed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

// ============================================================================
// ChangeEvent
// ============================================================================

/// A filesystem change the daemon reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent {
    /// A new file or directory appeared at the given path
    Created(PathBuf),
}

impl ChangeEvent {
    /// Returns the path associated with this event
    pub fn path(&self) -> &Path {
        match self {
            ChangeEvent::Created(p) => p,
        }
    }
}

// ============================================================================
// FileWatcher
// ============================================================================

/// Watches a directory tree using the OS-native mechanism
///
/// The `notify` watcher owns a background thread. Events are delivered on
/// that thread and pushed into a bounded channel with `blocking_send`, so a
/// slow consumer applies backpressure to the OS event reader rather than
/// growing memory. Dropping the watcher shuts the thread down, which drops
/// the channel sender and ends the receiver's stream.
///
/// ## Usage
///
/// ```ignore
/// let (mut watcher, mut rx) = FileWatcher::new(1024)?;
/// watcher.watch(Path::new("/home/user/Music"))?;
/// while let Some(event) = rx.recv().await { /* ... */ }
/// watcher.stop();
/// ```
pub struct FileWatcher {
    /// The underlying notify watcher instance
    watcher: RecommendedWatcher,
    /// Root currently being watched, if any
    watched: Option<PathBuf>,
}

impl FileWatcher {
    /// Creates a watcher whose events go to a channel of `capacity` slots
    ///
    /// Returns the watcher and the receiving half of the channel.
    ///
    /// # Errors
    /// Returns an error if the underlying OS watcher cannot be created
    pub fn new(capacity: usize) -> Result<(Self, mpsc::Receiver<ChangeEvent>)> {
        let (tx, rx) = mpsc::channel::<ChangeEvent>(capacity.max(1));

        info!(capacity, "Initializing file watcher");

        let watcher = RecommendedWatcher::new(
            move |res: std::result::Result<notify::Event, notify::Error>| match res {
                Ok(event) => {
                    if let Some(change) = map_notify_event(&event) {
                        if let Err(e) = tx.blocking_send(change) {
                            warn!(error = %e, "Failed to send change event (receiver dropped)");
                        }
                    }
                }
                Err(err) => {
                    error!(error = %err, "File watcher error");
                }
            },
            notify::Config::default(),
        )
        .context("Failed to create file watcher")?;

        Ok((
            Self {
                watcher,
                watched: None,
            },
            rx,
        ))
    }

    /// Starts watching `path` recursively
    ///
    /// # Errors
    /// Returns an error if the path cannot be watched (does not exist,
    /// insufficient permissions, or the inotify watch limit was reached)
    pub fn watch(&mut self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "Starting recursive watch");

        self.watcher
            .watch(path, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch path: {}", path.display()))?;

        self.watched = Some(path.to_path_buf());
        Ok(())
    }

    /// Stops watching `path`
    ///
    /// # Errors
    /// Returns an error if the path was not being watched
    pub fn unwatch(&mut self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "Stopping watch");

        self.watcher
            .unwatch(path)
            .with_context(|| format!("Failed to unwatch path: {}", path.display()))?;

        if self.watched.as_deref() == Some(path) {
            self.watched = None;
        }
        Ok(())
    }

    /// Returns the root currently being watched
    pub fn watched(&self) -> Option<&Path> {
        self.watched.as_deref()
    }

    /// Unwatches the root and drops the watcher, shutting down its thread
    ///
    /// Failure to unwatch is logged; the watcher is released regardless.
    pub fn stop(mut self) {
        if let Some(root) = self.watched.take() {
            if let Err(err) = self.watcher.unwatch(&root) {
                warn!(path = %root.display(), error = %err, "Failed to unwatch on stop");
            }
        }
        drop(self.watcher);
        debug!("File watcher stopped");
    }
}

// ============================================================================
// Event mapping - notify::Event → ChangeEvent
// ============================================================================

/// Converts a `notify::Event` into a [`ChangeEvent`]
///
/// Only `Create(*)` maps to `ChangeEvent::Created`; every other kind,
/// and any event without a path, yields `None`.
fn map_notify_event(event: &notify::Event) -> Option<ChangeEvent> {
    match &event.kind {
        EventKind::Create(_) => {
            let path = event.paths.first()?;
            debug!(path = %path.display(), "Mapped Create event");
            Some(ChangeEvent::Created(path.clone()))
        }
        _ => {
            debug!(kind = ?event.kind, "Ignoring event kind");
            None
        }
    }
}
