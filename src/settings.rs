use anyhow::{Context, Result};
use log::warn;
use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

/// Key under which the session identity survives restarts.
pub const USER_EMAIL_KEY: &str = "userEmail";

/// Small durable string map for per-device preferences.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

type Values = BTreeMap<String, String>;

/// Key-value store persisted as a pretty-printed JSON object.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<Values>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!(
                    "Ignoring unreadable settings file {}: {err}",
                    path.display()
                );
                Values::default()
            })
        } else {
            Values::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    fn persist(&self, data: &Values) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        self.persist(&guard)
    }
}

#[derive(Default)]
pub struct MemoryKeyValueStore {
    data: RwLock<Values>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn value_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = JsonFileStore::new(path.clone()).unwrap();
        assert_eq!(store.get(USER_EMAIL_KEY).unwrap(), None);
        store.set(USER_EMAIL_KEY, "a@b.com").unwrap();

        let reopened = JsonFileStore::new(path).unwrap();
        assert_eq!(
            reopened.get(USER_EMAIL_KEY).unwrap().as_deref(),
            Some("a@b.com")
        );
    }

    #[test]
    fn set_replaces_previous_value() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("settings.json")).unwrap();

        store.set(USER_EMAIL_KEY, "first@b.com").unwrap();
        store.set(USER_EMAIL_KEY, "second@b.com").unwrap();

        assert_eq!(
            store.get(USER_EMAIL_KEY).unwrap().as_deref(),
            Some("second@b.com")
        );
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{not json").unwrap();

        let store = JsonFileStore::new(path).unwrap();
        assert_eq!(store.get(USER_EMAIL_KEY).unwrap(), None);
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing").join("settings.json")).unwrap();

        assert!(store.set(USER_EMAIL_KEY, "a@b.com").is_err());
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.get("other").unwrap(), None);
    }
}
