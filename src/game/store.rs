use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::{trace, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::settings::Settings;

pub const PUZZLE_SET_KEY: &str = "dps";
pub const STATISTICS_KEY: &str = "stats";
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value persistence. `save` replaces the whole value under a key.
///
/// `load` never fails: missing or undecodable data is `None`.
pub trait Store {
    fn load(&self, key: &str) -> Option<Value>;
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

pub type SharedStore = Rc<RefCell<dyn Store>>;

/// Loads and decodes a record. A value of the wrong shape is treated as absent.
pub fn load_record<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let value = store.load(key)?;
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(target: "store", "Discarding malformed record {:?}: {}", key, err);
            None
        }
    }
}

pub fn save_record<T: Serialize>(store: &mut dyn Store, key: &str, record: &T) -> Result<(), StoreError> {
    let value = serde_json::to_value(record)?;
    store.save(key, value)
}

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// A store in `STARCHAIN_DATA_DIR`, or the per-user data directory.
    pub fn from_env() -> Self {
        Self::new(Settings::data_dir_from_env())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Store for JsonFileStore {
    fn load(&self, key: &str) -> Option<Value> {
        let path = self.path(key);
        let contents = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(target: "store", "Ignoring corrupt file {}: {}", path.display(), err);
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        fs::create_dir_all(&self.data_dir)?;
        let contents = serde_json::to_string_pretty(&value)?;
        let path = self.path(key);
        fs::write(&path, contents)?;
        trace!(target: "store", "Saved {}", path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Option<Value> {
        self.values.get(key).filter(|v| !v.is_null()).cloned()
    }

    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.values.remove(key);
        Ok(())
    }
}
