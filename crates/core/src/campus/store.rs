//! JSON file persistence for the campus tables.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing::warn;

/// Typed load/save wrapper around one JSON file.
///
/// Loads fall back to `T::default()` on a missing, blank or corrupt file so
/// a damaged table never takes the service down; saves report their error to
/// the caller, who logs and carries on.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned + Default> JsonStore<T> {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    pub fn load(&self) -> T {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return T::default(),
        };
        if raw.trim().is_empty() {
            return T::default();
        }
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), "Unreadable campus table, starting fresh: {}", e);
                T::default()
            }
        }
    }

    pub fn save(&self, value: &T) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)
    }
}

/// Timestamp format shared by all campus tables.
pub(crate) fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        count: u32,
        name: String,
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Sample> = JsonStore::open(dir.path().join("missing.json"));
        assert_eq!(store.load(), Sample::default());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<Sample> = JsonStore::open(dir.path().join("nested/sample.json"));
        let value = Sample {
            count: 3,
            name: "oscar".to_string(),
        };
        store.save(&value).unwrap();
        assert_eq!(store.load(), value);
    }

    #[test]
    fn corrupt_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        let store: JsonStore<Sample> = JsonStore::open(path);
        assert_eq!(store.load(), Sample::default());
    }
}
