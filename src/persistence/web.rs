//! Browser store backed by LocalStorage

use web_sys::Storage;

use super::KeyValueStore;

#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match Self::storage() {
            Some(storage) => storage.set_item(key, value).is_ok(),
            None => {
                log::warn!("LocalStorage unavailable, '{}' not saved", key);
                false
            }
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        Self::storage()
            .map(|s| s.remove_item(key).is_ok())
            .unwrap_or(false)
    }
}
