use std::path::PathBuf;

use log::error;
use serde::{Deserialize, Serialize};

use super::store::{load_record, save_record, SharedStore, StoreError, SETTINGS_KEY};
use crate::model::Calendar;

const DATA_DIR_ENV: &str = "STARCHAIN_DATA_DIR";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Offset of the reference timezone that decides when a new day's puzzles start.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

// Helper functions for default values
fn default_version() -> u32 {
    2
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            utc_offset_minutes: 0,
        }
    }
}

impl Settings {
    pub fn load(store: &SharedStore) -> Self {
        if let Some(mut settings) = load_record::<Settings>(&*store.borrow(), SETTINGS_KEY) {
            settings.migrate();
            return settings;
        }
        let default = Settings::default();
        if let Err(err) = default.save(store) {
            error!(target: "settings", "Failed to save default settings: {}", err);
        }
        default
    }

    pub fn save(&self, store: &SharedStore) -> Result<(), StoreError> {
        save_record(&mut *store.borrow_mut(), SETTINGS_KEY, self)
    }

    fn migrate(&mut self) {
        match self.version {
            // version 1 had no reference offset and always used UTC
            0 | 1 => {
                self.utc_offset_minutes = 0;
                self.version = 2;
            }
            _ => (),
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::from_offset_minutes(self.utc_offset_minutes)
    }

    pub fn is_debug_mode() -> bool {
        std::env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    /// Replaces the daily seed, so every day plays the same set.
    pub fn seed_from_env() -> Option<String> {
        std::env::var("SEED").ok().filter(|v| !v.is_empty())
    }

    pub fn data_dir_from_env() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        let home = std::env::var_os("HOME").map(PathBuf::from).unwrap_or_default();
        home.join(".local").join("share").join("starchain")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::store::{MemoryStore, Store};
    use serde_json::json;
    use serial_test::serial;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_load_saves_defaults() {
        let memory = Rc::new(RefCell::new(MemoryStore::new()));
        let store: SharedStore = memory.clone();

        let settings = Settings::load(&store);
        assert_eq!(settings, Settings::default());
        assert!(memory.borrow().contains(SETTINGS_KEY));
    }

    #[test]
    fn test_migrates_old_versions() {
        let memory = Rc::new(RefCell::new(MemoryStore::new()));
        memory
            .borrow_mut()
            .save(SETTINGS_KEY, json!({"version": 1, "utcOffsetMinutes": 120}))
            .unwrap();
        let store: SharedStore = memory.clone();

        let settings = Settings::load(&store);
        assert_eq!(settings.version(), 2);
        assert_eq!(settings.utc_offset_minutes, 0);
    }

    #[test]
    fn test_keeps_current_version_values() {
        let memory = Rc::new(RefCell::new(MemoryStore::new()));
        memory
            .borrow_mut()
            .save(SETTINGS_KEY, json!({"version": 2, "utcOffsetMinutes": -300}))
            .unwrap();
        let store: SharedStore = memory.clone();

        let settings = Settings::load(&store);
        assert_eq!(settings.utc_offset_minutes, -300);
        assert_eq!(settings.calendar().offset().local_minus_utc(), -300 * 60);
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        std::env::set_var("SEED", "practice-seed");
        std::env::set_var("DEBUG", "1");
        std::env::set_var(DATA_DIR_ENV, "/tmp/starchain-test");
        assert_eq!(Settings::seed_from_env().as_deref(), Some("practice-seed"));
        assert!(Settings::is_debug_mode());
        assert_eq!(
            Settings::data_dir_from_env(),
            PathBuf::from("/tmp/starchain-test")
        );

        std::env::remove_var("SEED");
        std::env::remove_var("DEBUG");
        std::env::remove_var(DATA_DIR_ENV);
        assert_eq!(Settings::seed_from_env(), None);
        assert!(!Settings::is_debug_mode());
    }
}
