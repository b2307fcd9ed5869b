//! Small string key-value backends used to persist the signed-in session.

use crate::core::config::data::path_display;
use crate::core::config::io::write_atomically;
use crate::core::keyring::KeyringError;
use keyring::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Failed to access {}: {source}", path_display(.path))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored data at {} is not valid JSON: {source}", path_display(.path))]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Keyring(#[from] KeyringError),

    #[error("{0}")]
    Unavailable(String),
}

impl From<keyring::Error> for KvError {
    fn from(err: keyring::Error) -> Self {
        KvError::Keyring(KeyringError::from(err))
    }
}

pub trait KvBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Write every entry, or none of them.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KvError>;

    fn remove_many(&self, keys: &[&str]) -> Result<(), KvError>;

    /// Human-readable location, for status output.
    fn describe(&self) -> String;
}

/// All entries live in one JSON object file, rewritten atomically.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, KvError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(BTreeMap::new());
            }
            Err(source) => {
                return Err(KvError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| KvError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), KvError> {
        let io_err = |source: std::io::Error| KvError::Io {
            path: self.path.clone(),
            source,
        };
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(io_err(err)),
            };
        }
        let contents = serde_json::to_string_pretty(map).map_err(|source| KvError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        write_atomically(&self.path, contents.as_bytes()).map_err(io_err)
    }

    /// Current map, or an empty one if the file is unreadable as JSON.
    fn read_map_for_update(&self) -> Result<BTreeMap<String, String>, KvError> {
        match self.read_map() {
            Err(err @ KvError::Corrupt { .. }) => {
                warn!(error = %err, "discarding corrupt session file");
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KvError> {
        let mut map = self.read_map_for_update()?;
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        self.write_map(&map)?;
        debug!(path = %path_display(&self.path), keys = entries.len(), "session entries written");
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), KvError> {
        let mut map = self.read_map_for_update()?;
        for key in keys {
            map.remove(*key);
        }
        self.write_map(&map)
    }

    fn describe(&self) -> String {
        path_display(&self.path)
    }
}

/// Entries stored in the OS keyring, one credential per key.
#[derive(Debug, Clone)]
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, KvError> {
        Ok(Entry::new(&self.service, key)?)
    }

    fn delete(&self, key: &str) -> Result<(), KvError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    fn restore(&self, key: &str, previous: Option<&str>) {
        let result = match previous {
            Some(value) => self
                .entry(key)
                .and_then(|entry| entry.set_password(value).map_err(KvError::from)),
            None => self.delete(key),
        };
        if let Err(err) = result {
            warn!(key, error = %err, "failed to roll back keyring entry");
        }
    }
}

/// Write `entries` one at a time, restoring earlier ones if any read or
/// write fails. A key whose previous value can't be read is never written.
fn write_all_or_restore(
    entries: &[(&str, &str)],
    read: impl Fn(&str) -> Result<Option<String>, KvError>,
    write: impl Fn(&str, &str) -> Result<(), KvError>,
    restore: impl Fn(&str, Option<&str>),
) -> Result<(), KvError> {
    let mut written: Vec<(&str, Option<String>)> = Vec::new();
    for &(key, value) in entries {
        let result = read(key).and_then(|previous| {
            write(key, value)?;
            Ok(previous)
        });
        match result {
            Ok(previous) => written.push((key, previous)),
            Err(err) => {
                for (done_key, previous) in written.iter().rev() {
                    restore(*done_key, previous.as_deref());
                }
                return Err(err);
            }
        }
    }
    Ok(())
}

impl KvBackend for KeyringBackend {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KvError> {
        write_all_or_restore(
            entries,
            |key| self.get(key),
            |key, value| Ok(self.entry(key)?.set_password(value)?),
            |key, previous| self.restore(key, previous),
        )
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), KvError> {
        let mut first_error = None;
        for key in keys {
            if let Err(err) = self.delete(key) {
                warn!(key, error = %err, "failed to remove keyring entry");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn describe(&self) -> String {
        format!("system keyring (service '{}')", self.service)
    }
}

/// In-process backend for tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
    read_only: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: &[(&str, &str)]) -> Self {
        let map = entries
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        Self {
            entries: Mutex::new(map),
            read_only: false,
        }
    }

    /// A backend whose writes always fail.
    pub fn read_only(entries: &[(&str, &str)]) -> Self {
        Self {
            read_only: true,
            ..Self::with_entries(entries)
        }
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), KvError> {
        if self.read_only {
            Err(KvError::Unavailable("backend is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KvError> {
        self.check_writable()?;
        let mut map = self.lock();
        for (key, value) in entries {
            map.insert((*key).to_string(), (*value).to_string());
        }
        Ok(())
    }

    fn remove_many(&self, keys: &[&str]) -> Result<(), KvError> {
        self.check_writable()?;
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_backend_round_trips_entries() {
        let temp_dir = TempDir::new().expect("temp dir");
        let backend = FileBackend::new(temp_dir.path().join("data").join("session.json"));

        backend
            .set_many(&[("token", "t1"), ("user", "{}")])
            .expect("write succeeds");
        assert_eq!(backend.get("token").expect("read"), Some("t1".to_string()));
        assert_eq!(backend.get("user").expect("read"), Some("{}".to_string()));
        assert_eq!(backend.get("other").expect("read"), None);

        backend.remove_many(&["token", "user"]).expect("remove succeeds");
        assert!(!backend.path().exists(), "empty store deletes its file");
        assert_eq!(backend.get("token").expect("read"), None);
    }

    #[test]
    fn file_backend_reports_corrupt_file_on_read() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write file");
        let backend = FileBackend::new(&path);

        assert!(matches!(
            backend.get("token"),
            Err(KvError::Corrupt { .. })
        ));
    }

    #[test]
    fn file_backend_overwrites_corrupt_file_on_write() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write file");
        let backend = FileBackend::new(&path);

        backend.set_many(&[("token", "t2")]).expect("write succeeds");
        assert_eq!(backend.get("token").expect("read"), Some("t2".to_string()));
    }

    #[test]
    fn file_backend_recovers_from_non_utf8_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("session.json");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).expect("write file");
        let backend = FileBackend::new(&path);

        assert!(matches!(
            backend.get("token"),
            Err(KvError::Corrupt { .. })
        ));
        backend.set_many(&[("token", "t3")]).expect("write replaces garbage");
        assert_eq!(backend.get("token").expect("read"), Some("t3".to_string()));

        fs::write(&path, [0xff, 0xfe]).expect("write file");
        backend.remove_many(&["token"]).expect("clear replaces garbage");
        assert!(!path.exists());
    }

    #[test]
    fn file_backend_remove_on_missing_file_is_ok() {
        let temp_dir = TempDir::new().expect("temp dir");
        let backend = FileBackend::new(temp_dir.path().join("missing.json"));
        backend.remove_many(&["token"]).expect("nothing to remove");
    }

    #[test]
    fn unreadable_previous_value_stops_and_restores_earlier_writes() {
        let store = Mutex::new(BTreeMap::from([
            ("token".to_string(), "t-old".to_string()),
            ("user".to_string(), "{\"id\":\"1\"}".to_string()),
        ]));
        let restored = Mutex::new(Vec::new());

        let result = write_all_or_restore(
            &[("token", "t-new"), ("user", "{}")],
            |key| match key {
                "user" => Err(KvError::Unavailable("keychain locked".to_string())),
                _ => Ok(store.lock().expect("lock").get(key).cloned()),
            },
            |key, value| {
                store
                    .lock()
                    .expect("lock")
                    .insert(key.to_string(), value.to_string());
                Ok(())
            },
            |key, previous| {
                restored
                    .lock()
                    .expect("lock")
                    .push((key.to_string(), previous.map(str::to_owned)));
                if let Some(value) = previous {
                    store
                        .lock()
                        .expect("lock")
                        .insert(key.to_string(), value.to_string());
                }
            },
        );

        assert!(matches!(result, Err(KvError::Unavailable(_))));
        let store = store.into_inner().expect("lock");
        assert_eq!(store.get("token").map(String::as_str), Some("t-old"));
        assert_eq!(store.get("user").map(String::as_str), Some("{\"id\":\"1\"}"));
        assert_eq!(
            restored.into_inner().expect("lock"),
            [("token".to_string(), Some("t-old".to_string()))]
        );
    }

    #[test]
    fn memory_backend_read_only_rejects_writes() {
        let backend = MemoryBackend::read_only(&[("token", "t1")]);
        assert!(backend.set_many(&[("user", "{}")]).is_err());
        assert!(backend.remove_many(&["token"]).is_err());
        assert_eq!(backend.get("token").expect("read"), Some("t1".to_string()));
    }
}
