//! Removal of request-scoped temporary uploads.
//!
//! A [`TempUpload`] owns one file in the uploads directory. The file is removed
//! when the guard is released or, failing that, when it is dropped, so every
//! exit path of a request gives the disk space back. Removing a file that is
//! already gone is a no-op.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Outcome of a removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    AlreadyGone,
}

/// Remove `path` if it still exists.
pub async fn remove_upload(path: &Path) -> std::io::Result<Removal> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(Removal::AlreadyGone);
    }
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::AlreadyGone),
        Err(e) => Err(e),
    }
}

/// Blocking variant of [`remove_upload`] for use from `Drop`.
fn remove_upload_blocking(path: &Path) -> std::io::Result<Removal> {
    if !path.try_exists()? {
        return Ok(Removal::AlreadyGone);
    }
    match std::fs::remove_file(path) {
        Ok(()) => Ok(Removal::Removed),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Removal::AlreadyGone),
        Err(e) => Err(e),
    }
}

/// Owning guard for a temporary upload file.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
    released: bool,
}

impl TempUpload {
    /// Take ownership of `path`. The file does not need to exist yet.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file. Consumes the guard so the path cannot be used afterwards.
    ///
    /// Failures are logged and swallowed: cleanup must never replace the
    /// outcome the caller is about to report.
    pub async fn release(mut self) -> Option<Removal> {
        self.released = true;
        match remove_upload(&self.path).await {
            Ok(removal) => {
                debug!(path = %self.path.display(), ?removal, "temporary upload released");
                Some(removal)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove temporary upload");
                None
            }
        }
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Only reached on error paths before `release`. The unlink runs inline,
        // even on a runtime thread, so the file is gone before the response is sent.
        match remove_upload_blocking(&self.path) {
            Ok(Removal::Removed) => {
                debug!(path = %self.path.display(), "temporary upload removed on drop");
            }
            Ok(Removal::AlreadyGone) => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to remove temporary upload");
            }
        }
    }
}
