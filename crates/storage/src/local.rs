//! In-process store backed by DashMap. Stands in for browser storage in
//! tests and for ephemeral sessions.

use crate::store::PersistentStore;
use dashmap::DashMap;
use showcase_core::{ShowcaseError, ShowcaseResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub struct MemoryStore {
    entries: DashMap<String, String>,
    quota_bytes: Option<usize>,
    available: AtomicBool,
    writes: AtomicU64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            quota_bytes: None,
            available: AtomicBool::new(true),
            writes: AtomicU64::new(0),
        }
    }

    /// A store that rejects writes pushing total value size past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    /// Toggle availability; an unavailable store fails every call.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Total bytes held across all keys.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.key().len() + e.value().len()).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn check_available(&self) -> ShowcaseResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(ShowcaseError::Storage("storage is unavailable".to_string()))
        }
    }
}

impl PersistentStore for MemoryStore {
    fn read(&self, key: &str) -> ShowcaseResult<Option<String>> {
        self.check_available()?;
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> ShowcaseResult<()> {
        self.check_available()?;
        if let Some(quota) = self.quota_bytes {
            let others: usize = self
                .entries
                .iter()
                .filter(|e| e.key() != key)
                .map(|e| e.key().len() + e.value().len())
                .sum();
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(others);
            if needed > available {
                return Err(ShowcaseError::QuotaExceeded { needed, available });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> ShowcaseResult<()> {
        self.check_available()?;
        self.entries.remove(key);
        Ok(())
    }
}
