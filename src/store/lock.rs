//! Advisory file locks shared by every process that opens the same data file.

use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;

use crate::app::Result;

/// An exclusive lock on a sidecar file next to the document.
#[derive(Debug, Clone)]
pub struct LockFile {
    path: PathBuf,
}

/// Holds the lock until dropped. Closing the handle releases it, so a
/// crashed process never leaves the lock behind.
#[derive(Debug)]
pub struct LockGuard {
    _file: File,
}

impl LockFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Block until the lock is ours.
    pub fn acquire(&self) -> Result<LockGuard> {
        let file = self.open()?;
        file.lock_exclusive()?;
        Ok(LockGuard { _file: file })
    }

    /// Take the lock if nobody holds it, otherwise `None`.
    pub fn try_acquire(&self) -> Result<Option<LockGuard>> {
        let file = self.open()?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(LockGuard { _file: file })),
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn open(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.path)?;
        Ok(file)
    }
}
