//! Key-value persistence used by the favorites capability.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use crate::error::StoreError;

/// Minimal synchronous key-value store holding JSON values.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if the key was never written.
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    fn save(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Read-modify-write `key` as one step: no other writer can slip in
    /// between the read handed to `apply` and the write of its result.
    ///
    /// When `apply` fails nothing is written.
    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> Result<(), StoreError>;
}

/// Transformation applied by [`KeyValueStore::update`] to the current value.
pub type UpdateFn<'a> = dyn FnMut(Option<Value>) -> Result<Value, StoreError> + 'a;

/// In-memory store. Contents live as long as the value.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.lock().insert(key.to_string(), value);
        Ok(())
    }

    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock();
        let updated = apply(entries.get(key).cloned())?;
        entries.insert(key.to_string(), updated);
        Ok(())
    }
}

/// Store backed by a single JSON object file.
///
/// Every read takes a shared lock and every write an exclusive lock on the
/// file. The exclusive lock spans the whole read-modify-write, so separate
/// processes (or separate stores on the same path) never lose each other's
/// updates or observe a half-written document.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn lock_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Lock {
            path: self.path.clone(),
            source,
        }
    }

    fn read_document(&self, file: &mut File) -> Result<Map<String, Value>, StoreError> {
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| self.io_error(e))?;

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        FileExt::lock_shared(&file).map_err(|e| self.lock_error(e))?;
        let document = self.read_document(&mut file);
        FileExt::unlock(&file).map_err(|e| self.lock_error(e))?;

        Ok(document?.remove(key))
    }

    fn save(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.update(key, &mut |_| Ok(value.clone()))
    }

    fn update(&self, key: &str, apply: &mut UpdateFn<'_>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        FileExt::lock_exclusive(&file).map_err(|e| self.lock_error(e))?;
        let result = self.rewrite(&mut file, key, apply);
        FileExt::unlock(&file).map_err(|e| self.lock_error(e))?;
        result
    }
}

impl FileStore {
    /// Apply `apply` to the current value of `key` and write the document
    /// back. Must be called with the exclusive lock held.
    fn rewrite(
        &self,
        file: &mut File,
        key: &str,
        apply: &mut UpdateFn<'_>,
    ) -> Result<(), StoreError> {
        let mut document = self.read_document(file)?;
        let updated = apply(document.remove(key))?;
        document.insert(key.to_string(), updated);

        let content = serde_json::to_string_pretty(&document).map_err(|e| StoreError::Serialize {
            key: key.to_string(),
            source: e,
        })?;

        file.seek(SeekFrom::Start(0)).map_err(|e| self.io_error(e))?;
        file.set_len(0).map_err(|e| self.io_error(e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn memory_store_round_trips_values() {
        let store = MemoryStore::new();
        assert_eq!(store.load("favorites").unwrap(), None);

        store.save("favorites", json!([1, 2])).unwrap();
        assert_eq!(store.load("favorites").unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn file_store_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.load("favorites").unwrap(), None);
    }

    #[test]
    fn file_store_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("store.json"));

        store.save("favorites", json!([3])).unwrap();
        store.save("other", json!("value")).unwrap();
        store.save("favorites", json!([3, 4])).unwrap();

        assert_eq!(store.load("favorites").unwrap(), Some(json!([3, 4])));
        assert_eq!(store.load("other").unwrap(), Some(json!("value")));
    }

    #[test]
    fn file_store_shrinking_value_leaves_valid_json() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));

        store.save("favorites", json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10])).unwrap();
        store.save("favorites", json!([])).unwrap();

        assert_eq!(store.load("favorites").unwrap(), Some(json!([])));
    }

    #[test]
    fn update_sees_current_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("store.json"));
        store.save("counter", json!(1)).unwrap();
        store.save("other", json!("kept")).unwrap();

        store
            .update("counter", &mut |current| {
                let n = current.and_then(|v| v.as_u64()).unwrap_or(0);
                Ok(json!(n + 1))
            })
            .unwrap();

        assert_eq!(store.load("counter").unwrap(), Some(json!(2)));
        assert_eq!(store.load("other").unwrap(), Some(json!("kept")));
    }

    #[test]
    fn failed_update_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = FileStore::new(&path);
        store.save("favorites", json!([1])).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result = store.update("favorites", &mut |_| {
            Err(StoreError::Lock {
                path: PathBuf::from("unused"),
                source: std::io::Error::other("refused"),
            })
        });

        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn memory_store_update_sees_missing_key() {
        let store = MemoryStore::new();
        store
            .update("favorites", &mut |current| {
                assert_eq!(current, None);
                Ok(json!([7]))
            })
            .unwrap();
        assert_eq!(store.load("favorites").unwrap(), Some(json!([7])));
    }

    #[test]
    fn file_store_rejects_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.load("favorites"),
            Err(StoreError::Parse { .. })
        ));
    }
}
