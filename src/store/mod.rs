pub mod json;
pub mod lock;

use std::sync::{Arc, Mutex};

use crate::app::{NewswatchError, Result};
use crate::domain::Document;

pub use json::JsonStore;
pub use lock::{LockFile, LockGuard};

/// Whole-document persistence. `save` must replace the stored document
/// atomically: a concurrent `load` sees either the old or the new document.
pub trait Store {
    fn load(&self) -> Result<Document>;
    fn save(&self, doc: &Document) -> Result<()>;

    /// Lock named `name` shared with other processes using the same storage.
    /// Stores that are private to one process return `None`.
    fn lock_file(&self, _name: &str) -> Option<LockFile> {
        None
    }
}

/// Permission to run a scan, held for the length of the scan.
#[derive(Debug)]
pub struct ScanClaim {
    _guard: Option<LockGuard>,
}

/// The single authoritative document.
///
/// Mutations run load-modify-save under the in-process mutex and the
/// store's write lock, so they never interleave, not even across processes.
/// Reads take a snapshot without locking.
pub struct SharedStore {
    inner: Arc<dyn Store + Send + Sync>,
    write_lock: Mutex<()>,
    write_file: Option<LockFile>,
    scan_file: Option<LockFile>,
}

impl SharedStore {
    pub fn new(inner: Arc<dyn Store + Send + Sync>) -> Self {
        let write_file = inner.lock_file("write");
        let scan_file = inner.lock_file("scan");
        Self {
            inner,
            write_lock: Mutex::new(()),
            write_file,
            scan_file,
        }
    }

    pub fn snapshot(&self) -> Result<Document> {
        self.inner.load()
    }

    /// Load, apply `f`, save. If `f` or the save fails nothing is written and
    /// the in-memory changes are dropped.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut Document) -> Result<T>) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| NewswatchError::Other(format!("store lock poisoned: {}", e)))?;
        let _file = self.write_file.as_ref().map(LockFile::acquire).transpose()?;

        let mut doc = self.inner.load()?;
        let out = f(&mut doc)?;
        self.inner.save(&doc)?;
        Ok(out)
    }

    /// Claim the right to scan. `None` while another process is scanning
    /// the same document.
    pub fn try_claim_scan(&self) -> Result<Option<ScanClaim>> {
        match &self.scan_file {
            Some(lock) => Ok(lock.try_acquire()?.map(|guard| ScanClaim {
                _guard: Some(guard),
            })),
            None => Ok(Some(ScanClaim { _guard: None })),
        }
    }
}
