//! Persistent key/value storage for preferences
//!
//! Backends behave like a platform preference store: typed float/int entries
//! that are buffered in memory by `set_*` and made durable by `flush`.

use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Current layout version of the preferences file
pub const PREFS_FILE_VERSION: u32 = 1;

/// Raw persisted value
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoredValue {
    Float(f32),
    Int(i64),
}

/// Key/value store the preferences are persisted to.
pub trait PrefsBackend {
    /// `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError>;

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError>;

    fn delete_key(&mut self, key: &str) -> Result<(), StorageError>;

    /// Make every buffered write durable. Flushing twice is the same as once.
    fn flush(&mut self) -> Result<(), StorageError>;

    fn has_key(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }

    fn get_float(&self, key: &str) -> Result<Option<f32>, StorageError> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::Float(v)) => Ok(Some(v)),
            Some(StoredValue::Int(_)) => Err(StorageError::TypeMismatch {
                key: key.to_string(),
                expected: "float",
            }),
        }
    }

    fn get_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        match self.get(key)? {
            None => Ok(None),
            Some(StoredValue::Int(v)) => Ok(Some(v)),
            Some(StoredValue::Float(_)) => Err(StorageError::TypeMismatch {
                key: key.to_string(),
                expected: "int",
            }),
        }
    }

    fn set_float(&mut self, key: &str, value: f32) -> Result<(), StorageError> {
        self.set(key, StoredValue::Float(value))
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        self.set(key, StoredValue::Int(value))
    }
}

impl<B: PrefsBackend + ?Sized> PrefsBackend for Box<B> {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).delete_key(key)
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        (**self).flush()
    }
}

/// Backend that never touches the disk
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryBackend {
    entries: BTreeMap<String, StoredValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<K: Into<String>>(entries: impl IntoIterator<Item = (K, StoredValue)>) -> Self {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn entries(&self) -> &BTreeMap<String, StoredValue> {
        &self.entries
    }
}

impl PrefsBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        Ok(self.entries.get(key).copied())
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default = "current_version")]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, StoredValue>,
}

fn current_version() -> u32 {
    PREFS_FILE_VERSION
}

/// Preferences kept in a pretty-printed JSON file
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl JsonFileBackend {
    /// Open the preferences file at `path`.
    ///
    /// Never fails: a missing file starts empty, and an unreadable or corrupt
    /// one is logged and replaced on the next flush.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_file(&path) {
            Ok(Some(file)) => {
                if file.version > PREFS_FILE_VERSION {
                    tracing::warn!(
                        path = %path.display(),
                        version = file.version,
                        "preferences file is newer than this build; reading known keys"
                    );
                }
                file.entries
            }
            Ok(None) => {
                tracing::debug!(path = %path.display(), "no preferences file yet");
                BTreeMap::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "starting from empty preferences");
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_file(path: &Path) -> Result<Option<PrefsFile>, StorageError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

impl PrefsBackend for JsonFileBackend {
    fn get(&self, key: &str) -> Result<Option<StoredValue>, StorageError> {
        Ok(self.entries.get(key).copied())
    }

    fn set(&mut self, key: &str, value: StoredValue) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let file = PrefsFile {
            version: PREFS_FILE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), entries = self.entries.len(), "preferences flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_backend_typed_access() {
        let mut backend = MemoryBackend::new();
        backend.set_float("MusicVolume", 0.5).unwrap();
        backend.set_int("QualityLevel", 2).unwrap();

        assert_eq!(backend.get_float("MusicVolume").unwrap(), Some(0.5));
        assert_eq!(backend.get_int("QualityLevel").unwrap(), Some(2));
        assert_eq!(backend.get_int("Fullscreen").unwrap(), None);
        assert!(matches!(
            backend.get_int("MusicVolume"),
            Err(StorageError::TypeMismatch { expected: "int", .. })
        ));

        backend.delete_key("MusicVolume").unwrap();
        assert!(!backend.has_key("MusicVolume").unwrap());
    }

    #[test]
    fn file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut backend = JsonFileBackend::open(&path);
        backend.set_float("SFXVolume", 0.25).unwrap();
        backend.set_int("Fullscreen", 0).unwrap();
        backend.flush().unwrap();

        let reopened = JsonFileBackend::open(&path);
        assert_eq!(reopened.get_float("SFXVolume").unwrap(), Some(0.25));
        assert_eq!(reopened.get_int("Fullscreen").unwrap(), Some(0));
    }

    #[test]
    fn writes_are_not_durable_until_flush() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut backend = JsonFileBackend::open(&path);
        backend.set_int("QualityLevel", 1).unwrap();
        assert!(!path.exists());

        backend.flush().unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn flush_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut backend = JsonFileBackend::open(&path);
        backend.set_float("MusicVolume", 0.6).unwrap();
        backend.set_int("ResolutionIndex", 3).unwrap();
        backend.flush().unwrap();
        let first = fs::read(&path).unwrap();
        backend.flush().unwrap();
        let second = fs::read(&path).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn file_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut backend = JsonFileBackend::open(&path);
        backend.set_float("MusicVolume", 0.75).unwrap();
        backend.set_int("Fullscreen", 1).unwrap();
        backend.flush().unwrap();

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["entries"]["MusicVolume"]["float"], 0.75);
        assert_eq!(value["entries"]["Fullscreen"]["int"], 1);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let mut backend = JsonFileBackend::open(&path);
        assert_eq!(backend.get("MusicVolume").unwrap(), None);

        // The next flush replaces the corrupt file.
        backend.set_float("MusicVolume", 0.1).unwrap();
        backend.flush().unwrap();
        assert_eq!(JsonFileBackend::open(&path).get_float("MusicVolume").unwrap(), Some(0.1));
    }

    #[test]
    fn newer_version_is_still_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(
            &path,
            r#"{"version": 9, "entries": {"QualityLevel": {"int": 4}}, "extra": true}"#,
        )
        .unwrap();

        let backend = JsonFileBackend::open(&path);
        assert_eq!(backend.get_int("QualityLevel").unwrap(), Some(4));
    }

    #[test]
    fn unwritable_path_reports_write_error() {
        let dir = tempdir().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let mut backend = JsonFileBackend::open(blocker.join("prefs.json"));
        backend.set_int("QualityLevel", 1).unwrap();
        assert!(matches!(backend.flush(), Err(StorageError::Write { .. })));
    }
}
