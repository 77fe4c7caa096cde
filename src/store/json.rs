use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::app::Result;
use crate::domain::Document;
use crate::store::{LockFile, Store};

/// Stores the document as pretty-printed JSON in a single file.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default document if nothing is stored yet.
    pub fn ensure_exists(&self) -> Result<()> {
        let _lock = self.sidecar_lock("write").acquire()?;
        if !self.path.exists() {
            self.save(&Document::default())?;
            tracing::info!("Created data file at {}", self.path.display());
        }
        Ok(())
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `data.json` + `write` gives `data.json.write.lock`.
    fn sidecar_lock(&self, name: &str) -> LockFile {
        let mut file_name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        file_name.push(format!(".{}.lock", name));
        LockFile::new(self.path.with_file_name(file_name))
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Document> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, doc: &Document) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)?;

        let json = serde_json::to_string_pretty(doc)?;

        // Uniquely named sibling, renamed over the target once complete
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Saved document to {}", self.path.display());
        Ok(())
    }

    fn lock_file(&self, name: &str) -> Option<LockFile> {
        Some(self.sidecar_lock(name))
    }
}
