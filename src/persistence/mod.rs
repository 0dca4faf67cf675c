//! Save/load persistence behind a key-value seam
//!
//! Features:
//! - `KeyValueStore` trait so settings and leaderboards can be injected
//! - Versioned JSON envelope
//! - Silent fallback to defaults on missing or corrupt data

pub mod envelope;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub use envelope::Envelope;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageStore;

/// String key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    /// Returns false if the value could not be stored
    fn set(&mut self, key: &str, value: &str) -> bool;
    fn remove(&mut self, key: &str) -> bool;
}

/// In-process store (tests, embedding hosts)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        self.values.insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }
}

/// Load an enveloped value, or None if missing/corrupt/wrong version
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
    version: u32,
) -> Option<T> {
    let json = store.get(key)?;
    let envelope: Envelope<T> = match serde_json::from_str(&json) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("Discarding corrupt '{}': {}", key, e);
            return None;
        }
    };
    if envelope.version != version {
        log::warn!(
            "Discarding '{}': version {} (expected {})",
            key,
            envelope.version,
            version
        );
        return None;
    }
    Some(envelope.payload)
}

/// Save a value inside a versioned envelope
pub fn save_json<T: Serialize>(
    store: &mut dyn KeyValueStore,
    key: &str,
    version: u32,
    value: &T,
) -> bool {
    match serde_json::to_string(&Envelope::new(version, value)) {
        Ok(json) => store.set(key, &json),
        Err(e) => {
            log::warn!("Could not serialize '{}': {}", key, e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        assert!(store.set("a", "1"));
        assert_eq!(store.get("a").as_deref(), Some("1"));
        assert!(store.remove("a"));
        assert!(!store.remove("a"));
    }

    #[test]
    fn test_json_roundtrip_and_fallbacks() {
        let mut store = MemoryStore::new();
        assert!(save_json(&mut store, "k", 1, &vec![3, 2, 1]));
        assert_eq!(load_json::<Vec<u32>>(&store, "k", 1), Some(vec![3, 2, 1]));
        // Version mismatch
        assert_eq!(load_json::<Vec<u32>>(&store, "k", 2), None);
        // Corrupt
        store.set("k", "{not json");
        assert_eq!(load_json::<Vec<u32>>(&store, "k", 1), None);
        // Missing
        assert_eq!(load_json::<Vec<u32>>(&store, "missing", 1), None);
    }
}
