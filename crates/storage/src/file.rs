//! Directory-backed store: one `<key>.json` file per key.
//!
//! Writes go to a temp file first and are renamed into place, so a crash
//! never leaves a half-written value behind. There is no cross-process
//! locking; two processes sharing a directory get last-write-wins.

use crate::store::PersistentStore;
use parking_lot::Mutex;
use showcase_core::{ShowcaseError, ShowcaseResult};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct JsonFileStore {
    dir: PathBuf,
    quota_bytes: Option<usize>,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, quota_bytes: Option<usize>) -> ShowcaseResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), "File store opened");
        Ok(Self {
            dir,
            quota_bytes,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> ShowcaseResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(ShowcaseError::Storage(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn bytes_used_except(&self, target: &Path) -> ShowcaseResult<usize> {
        let mut total = 0usize;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path == target || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            total += entry.metadata()?.len() as usize;
        }
        Ok(total)
    }
}

impl PersistentStore for JsonFileStore {
    fn read(&self, key: &str) -> ShowcaseResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> ShowcaseResult<()> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();

        if let Some(quota) = self.quota_bytes {
            let available = quota.saturating_sub(self.bytes_used_except(&path)?);
            if value.len() > available {
                return Err(ShowcaseError::QuotaExceeded {
                    needed: value.len(),
                    available,
                });
            }
        }

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> ShowcaseResult<()> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl std::fmt::Debug for JsonFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("dir", &self.dir)
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}
