//! Run-exclusivity lock
//!
//! One sync pass at a time. The lock is an exclusive file lock with an
//! RAII guard, so it is released on every exit path of a pass, including
//! early returns; a crashed process drops it with its file descriptors,
//! so a wedged flag cannot survive a restart.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::error::Result;

/// Factory for scoped acquisitions of a named lock file
pub struct RunLock {
    path: PathBuf,
}

/// Held lock; released on drop
pub struct RunGuard {
    _file: File,
}

impl RunLock {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to acquire the lock without blocking
    ///
    /// Returns `Ok(None)` when another pass already holds it.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock file cannot be created or opened.
    pub fn try_acquire(&self) -> Result<Option<RunGuard>> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                debug!(path = %self.path.display(), "run lock acquired");
                Ok(Some(RunGuard { _file: file }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
