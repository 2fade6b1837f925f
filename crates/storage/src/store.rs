//! The storage capability and its typed, failure-absorbing helpers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use showcase_core::ShowcaseResult;
use std::sync::Arc;
use tracing::warn;

/// Raw string storage addressed by key.
///
/// Backends report failures honestly; callers that want the site's
/// degrade-gracefully semantics use [`StoreExt`] instead.
pub trait PersistentStore: Send + Sync {
    /// Read the raw value under `key`. `Ok(None)` means nothing is stored.
    fn read(&self, key: &str) -> ShowcaseResult<Option<String>>;

    /// Replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> ShowcaseResult<()>;

    /// Delete the value under `key`. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> ShowcaseResult<()>;
}

pub type SharedStore = Arc<dyn PersistentStore>;

/// JSON helpers over any [`PersistentStore`] that never fail.
pub trait StoreExt {
    /// Parsed value under `key`, or `default` when the key is absent, the
    /// JSON does not parse, or the backend cannot be read.
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T;

    /// Stored JSON array under `key`, decoded entry by entry. Entries that
    /// do not decode as `T` are skipped with a warning instead of losing the
    /// whole list. Anything that is not an array reads as empty.
    fn get_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T>;

    /// Serialize and write `value`. Returns whether the write reached the
    /// backend; a failure is logged and otherwise ignored.
    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool;

    /// Remove `key`, logging any failure. Returns whether it succeeded.
    fn clear(&self, key: &str) -> bool;
}

impl<S: PersistentStore + ?Sized> StoreExt for S {
    fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.read(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                warn!(key, error = %e, "Unable to read stored value");
                return default;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Stored value is not valid JSON, using default");
                default
            }
        }
    }

    fn get_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let entries: Vec<serde_json::Value> = self.get(key, Vec::new());
        let total = entries.len();
        let items: Vec<T> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(key, index, error = %e, "Skipping unreadable stored entry");
                    None
                }
            })
            .collect();
        if items.len() != total {
            warn!(key, kept = items.len(), total, "Stored list partially recovered");
        }
        items
    }

    fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(key, error = %e, "Unable to serialize value");
                return false;
            }
        };
        match self.write(key, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Unable to save value, keeping in-memory state only");
                false
            }
        }
    }

    fn clear(&self, key: &str) -> bool {
        match self.remove(key) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Unable to remove stored value");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use showcase_core::ShowcaseError;

    struct BrokenStore;

    impl PersistentStore for BrokenStore {
        fn read(&self, _key: &str) -> ShowcaseResult<Option<String>> {
            Err(ShowcaseError::Storage("storage disabled".into()))
        }
        fn write(&self, _key: &str, _value: &str) -> ShowcaseResult<()> {
            Err(ShowcaseError::Storage("storage disabled".into()))
        }
        fn remove(&self, _key: &str) -> ShowcaseResult<()> {
            Err(ShowcaseError::Storage("storage disabled".into()))
        }
    }

    #[test]
    fn test_get_returns_default_when_absent() {
        let store = MemoryStore::new();
        let value: Vec<u32> = store.get("missing", vec![7]);
        assert_eq!(value, vec![7]);
    }

    #[test]
    fn test_get_returns_default_on_corrupt_json() {
        let store = MemoryStore::new();
        store.write("numbers", "[1, 2,").unwrap();
        let value: Vec<u32> = store.get("numbers", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        assert!(store.set("numbers", &vec![1u32, 2, 3]));
        let value: Vec<u32> = store.get("numbers", Vec::new());
        assert_eq!(value, vec![1, 2, 3]);
    }

    #[test]
    fn test_get_list_skips_bad_entries() {
        let store = MemoryStore::new();
        store.write("numbers", r#"[1, "two", 3, null, -4]"#).unwrap();
        let value: Vec<u32> = store.get_list("numbers");
        assert_eq!(value, vec![1, 3]);

        store.write("numbers", r#"{"not":"a list"}"#).unwrap();
        assert!(store.get_list::<u32>("numbers").is_empty());
        assert!(BrokenStore.get_list::<u32>("numbers").is_empty());
    }

    #[test]
    fn test_unavailable_backend_degrades_to_defaults() {
        let store = BrokenStore;
        let flag: bool = store.get("flag", false);
        assert!(!flag);
        assert!(!store.set("flag", &true));
        assert!(!store.clear("flag"));
    }

    #[test]
    fn test_works_through_shared_handle() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        assert!(store.set("name", "admin"));
        let name: Option<String> = store.get("name", None);
        assert_eq!(name.as_deref(), Some("admin"));
    }
}
