//! Recursive file enumeration
//!
//! Lists every regular file under a directory. Directories are descended,
//! never returned. Hidden entries (names starting with `.`) are skipped along
//! with everything beneath them. The event handler applies the same rule to
//! watched paths through [`is_hidden_within`].
//!
//! Symlinks to files are returned; symlinks to directories are not followed,
//! so a link cycle cannot trap the walk.
//!
//! Unreadable subdirectories and entries are logged and skipped; only a root
//! that cannot be read at all is an error.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::{debug, warn};

use crate::SyncError;

/// Returns every regular file beneath `root`, in enumeration order
///
/// The order is whatever the platform's `read_dir` yields and is not stable.
///
/// # Errors
/// Returns [`SyncError::NotADirectory`] if `root` is not a directory, or
/// [`SyncError::IoError`] if it cannot be listed
pub async fn collect_files(root: &Path) -> Result<Vec<PathBuf>, SyncError> {
    let metadata = tokio::fs::metadata(root).await?;
    if !metadata.is_dir() {
        return Err(SyncError::NotADirectory(root.to_path_buf()));
    }

    let mut entries = tokio::fs::read_dir(root).await?;
    let mut files = Vec::new();

    while let Some(entry) = next_entry(&mut entries, root).await {
        visit(entry, &mut files).await;
    }

    debug!(root = %root.display(), count = files.len(), "Collected files");
    Ok(files)
}

/// Walks one subdirectory, logging and skipping anything unreadable
fn walk_directory<'a>(
    dir: PathBuf,
    files: &'a mut Vec<PathBuf>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
    Box::pin(async move {
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(path = %dir.display(), error = %err, "Cannot read directory, skipping");
                return;
            }
        };

        while let Some(entry) = next_entry(&mut entries, &dir).await {
            visit(entry, files).await;
        }
    })
}

async fn visit(entry: tokio::fs::DirEntry, files: &mut Vec<PathBuf>) {
    let path = entry.path();
    if is_hidden(&path) {
        debug!(path = %path.display(), "Skipping hidden entry");
        return;
    }
    let file_type = match entry.file_type().await {
        Ok(file_type) => file_type,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Cannot stat entry, skipping");
            return;
        }
    };

    if file_type.is_dir() {
        walk_directory(path, files).await;
    } else if file_type.is_file() {
        files.push(path);
    } else if file_type.is_symlink() {
        match tokio::fs::metadata(&path).await {
            Ok(target) if target.is_file() => files.push(path),
            Ok(_) => debug!(path = %path.display(), "Not following directory symlink"),
            Err(err) => warn!(path = %path.display(), error = %err, "Dangling symlink, skipping"),
        }
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Whether `path` is hidden or sits beneath a hidden directory below `root`
///
/// Components of `root` itself are not considered. A path outside `root`
/// is judged by its own file name only.
pub fn is_hidden_within(root: &Path, path: &Path) -> bool {
    match path.strip_prefix(root) {
        Ok(relative) => relative
            .components()
            .any(|c| c.as_os_str().to_str().is_some_and(|name| name.starts_with('.'))),
        Err(_) => is_hidden(path),
    }
}

/// Next directory entry; a read error ends the listing of that directory
async fn next_entry(entries: &mut tokio::fs::ReadDir, dir: &Path) -> Option<tokio::fs::DirEntry> {
    match entries.next_entry().await {
        Ok(entry) => entry,
        Err(err) => {
            warn!(path = %dir.display(), error = %err, "Directory listing interrupted");
            None
        }
    }
}
