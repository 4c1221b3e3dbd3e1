use chrono::NaiveDate;
use log::{error, warn};

use super::store::{load_record, save_record, SharedStore, StoreError, STATISTICS_KEY};
use crate::model::GameStatistics;

/// Owns the persisted statistics record; every change is saved as a whole.
pub struct StatsManager {
    store: SharedStore,
    stats: GameStatistics,
}

impl std::fmt::Debug for StatsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsManager")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl StatsManager {
    /// Loads statistics, discarding anything malformed, and refreshes the streak for `today`.
    pub fn load(store: SharedStore, today: NaiveDate) -> Self {
        let loaded = load_record::<GameStatistics>(&*store.borrow(), STATISTICS_KEY);
        let mut stats = match loaded {
            Some(stats) if stats.is_well_formed() => stats,
            Some(_) => {
                warn!(target: "stats", "Discarding inconsistent statistics record");
                GameStatistics::default()
            }
            None => GameStatistics::default(),
        };
        stats.refold();
        stats.refresh_streak(today);

        Self { store, stats }
    }

    pub fn stats(&self) -> &GameStatistics {
        &self.stats
    }

    fn save(&self) -> Result<(), StoreError> {
        save_record(&mut *self.store.borrow_mut(), STATISTICS_KEY, &self.stats)
    }

    pub fn record_collection(
        &mut self,
        date: &str,
        puzzle_index: usize,
        stars: u8,
        today: NaiveDate,
    ) -> &GameStatistics {
        self.stats.record_collection(date, puzzle_index, stars, today);
        if let Err(err) = self.save() {
            error!(target: "stats", "Failed to save statistics: {}", err);
        }
        &self.stats
    }

    /// Clears every field and removes the persisted record.
    pub fn reset(&mut self) -> &GameStatistics {
        self.stats = GameStatistics::default();
        if let Err(err) = self.store.borrow_mut().remove(STATISTICS_KEY) {
            error!(target: "stats", "Failed to remove statistics: {}", err);
        }
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::store::{MemoryStore, Store};
    use crate::model::calendar::parse_day_key;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn stores() -> (Rc<RefCell<MemoryStore>>, SharedStore) {
        let memory = Rc::new(RefCell::new(MemoryStore::new()));
        let shared: SharedStore = memory.clone();
        (memory, shared)
    }

    fn today() -> NaiveDate {
        parse_day_key("2026-10-16").unwrap()
    }

    #[test]
    fn test_collection_is_persisted() {
        let (memory, store) = stores();
        let mut manager = StatsManager::load(store.clone(), today());
        manager.record_collection("2026-10-16", 0, 2, today());

        let reloaded = StatsManager::load(store, today());
        assert_eq!(reloaded.stats(), manager.stats());
        assert!(memory.borrow().contains(STATISTICS_KEY));
    }

    #[test]
    fn test_reset_removes_record() {
        let (memory, store) = stores();
        let mut manager = StatsManager::load(store.clone(), today());
        manager.record_collection("2026-10-15", 1, 3, today());
        manager.record_collection("2026-10-16", 1, 3, today());

        let stats = manager.reset();
        assert_eq!(stats, &GameStatistics::default());
        assert!(!memory.borrow().contains(STATISTICS_KEY));
        assert_eq!(StatsManager::load(store, today()).stats(), &GameStatistics::default());
    }

    #[test]
    fn test_corrupt_record_loads_as_default() {
        let (memory, store) = stores();
        memory
            .borrow_mut()
            .save(STATISTICS_KEY, json!({"daysPlayed": "many"}))
            .unwrap();
        assert_eq!(
            StatsManager::load(store, today()).stats(),
            &GameStatistics::default()
        );
    }

    #[test]
    fn test_inconsistent_record_loads_as_default() {
        let (memory, store) = stores();
        memory
            .borrow_mut()
            .save(
                STATISTICS_KEY,
                json!({"dailyStats": {"someday": {"date": "someday", "puzzleStars": [3, 3, 3, 3, 3]}}}),
            )
            .unwrap();
        assert_eq!(
            StatsManager::load(store, today()).stats(),
            &GameStatistics::default()
        );
    }

    #[test]
    fn test_load_refolds_and_refreshes_streak() {
        let (memory, store) = stores();
        memory
            .borrow_mut()
            .save(
                STATISTICS_KEY,
                json!({
                    "totalStars": 500,
                    "currentStreak": 9,
                    "bestStreak": 9,
                    "dailyStats": {
                        "2026-10-10": {"date": "2026-10-10", "puzzleStars": [1, 0, 0, 0, 0]}
                    }
                }),
            )
            .unwrap();

        let manager = StatsManager::load(store, today());
        assert_eq!(manager.stats().total_stars, 1);
        assert_eq!(manager.stats().days_played, 1);
        assert_eq!(manager.stats().current_streak, 0);
        assert_eq!(manager.stats().best_streak, 9);
    }
}
