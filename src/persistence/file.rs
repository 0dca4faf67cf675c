//! Native store: one JSON file per key

use std::fs;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir` (created lazily on first write)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        if let Err(e) = fs::create_dir_all(&self.dir) {
            log::warn!("Cannot create {}: {}", self.dir.display(), e);
            return false;
        }
        // temp file + rename: readers see the old value or the new one
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        match fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &path)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cannot save {}: {}", path.display(), e);
                false
            }
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        fs::remove_file(self.path_for(key)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("off-color-test-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert_eq!(store.get("off_color/settings"), None);
        assert!(store.set("off_color/settings", "{\"a\":1}"));
        assert_eq!(store.get("off_color/settings").as_deref(), Some("{\"a\":1}"));
        assert!(store.remove("off_color/settings"));
        assert_eq!(store.get("off_color/settings"), None);
        let _ = fs::remove_dir_all(&dir);
    }
}
