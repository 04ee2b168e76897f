//! String-keyed storage slots
//!
//! Leaderboard and settings each live in one slot holding a JSON string.
//! Reads never fail: a missing or unreadable slot is `None` and callers fall
//! back to defaults. Writes are best-effort and report success as a bool.

use std::collections::HashMap;

/// A minimal LocalStorage-shaped store
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> bool;
    fn remove_item(&mut self, key: &str);
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }

    fn remove_item(&mut self, key: &str) {
        self.items.remove(key);
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::fs;
    use std::path::PathBuf;

    use super::KeyValueStore;

    /// One `<key>.json` file per slot in a directory (native)
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    impl FileStore {
        pub fn new(dir: impl Into<PathBuf>) -> Self {
            Self { dir: dir.into() }
        }

        fn path(&self, key: &str) -> PathBuf {
            let name: String = key
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
                .collect();
            self.dir.join(format!("{name}.json"))
        }
    }

    impl KeyValueStore for FileStore {
        fn get_item(&self, key: &str) -> Option<String> {
            fs::read_to_string(self.path(key)).ok()
        }

        fn set_item(&mut self, key: &str, value: &str) -> bool {
            if let Err(e) = fs::create_dir_all(&self.dir) {
                log::warn!("Cannot create {:?}: {}", self.dir, e);
                return false;
            }
            match fs::write(self.path(key), value) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Cannot write slot {}: {}", key, e);
                    false
                }
            }
        }

        fn remove_item(&mut self, key: &str) {
            let _ = fs::remove_file(self.path(key));
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

#[cfg(target_arch = "wasm32")]
mod local {
    use super::KeyValueStore;

    /// Browser LocalStorage (silently empty when unavailable)
    #[derive(Debug, Default)]
    pub struct LocalStore;

    impl LocalStore {
        fn storage() -> Option<web_sys::Storage> {
            web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()
        }
    }

    impl KeyValueStore for LocalStore {
        fn get_item(&self, key: &str) -> Option<String> {
            Self::storage()?.get_item(key).ok().flatten()
        }

        fn set_item(&mut self, key: &str, value: &str) -> bool {
            match Self::storage() {
                Some(storage) => storage.set_item(key, value).is_ok(),
                None => false,
            }
        }

        fn remove_item(&mut self, key: &str) {
            if let Some(storage) = Self::storage() {
                let _ = storage.remove_item(key);
            }
        }
    }
}

/// Platform default store: LocalStorage on web, memory on native
pub fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStore)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.get_item("k").is_none());
        assert!(store.set_item("k", "v"));
        assert_eq!(store.get_item("k").as_deref(), Some("v"));
        store.remove_item("k");
        assert!(store.get_item("k").is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join(format!("shpwat-fred-test-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert!(store.get_item("dote-shpwat-fred-leaderboard").is_none());
        assert!(store.set_item("dote-shpwat-fred-leaderboard", "[]"));
        assert_eq!(
            store.get_item("dote-shpwat-fred-leaderboard").as_deref(),
            Some("[]")
        );
        store.remove_item("dote-shpwat-fred-leaderboard");
        assert!(store.get_item("dote-shpwat-fred-leaderboard").is_none());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
