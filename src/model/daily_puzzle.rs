use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::TimestampSeconds;

use super::NumberSet;

pub const DAILY_PUZZLE_COUNT: usize = 5;
pub const MAX_STARS: u8 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPuzzle {
    pub id: usize,
    pub number_set: NumberSet,
    pub target: i64,
    pub solution: Vec<String>,
    #[serde(default)]
    pub stars: u8,
    #[serde(default)]
    pub solution_shown: bool,
}

impl DailyPuzzle {
    pub fn new(id: usize, number_set: NumberSet, target: i64, solution: Vec<String>) -> Self {
        Self {
            id,
            number_set,
            target,
            solution,
            stars: 0,
            solution_shown: false,
        }
    }

    pub fn can_earn_stars(&self) -> bool {
        !self.solution_shown
    }

    /// Raises the best rating. Never lowers it, and does nothing once the solution was shown.
    pub fn record_stars(&mut self, stars: u8) -> bool {
        if self.solution_shown || stars <= self.stars {
            return false;
        }
        self.stars = stars.min(MAX_STARS);
        true
    }

    fn is_well_formed(&self, index: usize) -> bool {
        self.id == index && self.stars <= MAX_STARS && self.number_set.remaining() > 0
    }
}

fn generated_now() -> SystemTime {
    SystemTime::now()
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPuzzleSet {
    pub seed: String,
    pub puzzles: Vec<DailyPuzzle>,
    pub current_puzzle_index: usize,
    #[serde_as(as = "TimestampSeconds")]
    #[serde(default = "generated_now")]
    pub generated_at: SystemTime,
}

impl DailyPuzzleSet {
    pub fn new(seed: String, puzzles: Vec<DailyPuzzle>) -> Self {
        Self {
            seed,
            puzzles,
            current_puzzle_index: 0,
            generated_at: SystemTime::now(),
        }
    }

    pub fn current(&self) -> &DailyPuzzle {
        &self.puzzles[self.current_puzzle_index]
    }

    pub fn current_mut(&mut self) -> &mut DailyPuzzle {
        &mut self.puzzles[self.current_puzzle_index]
    }

    /// Time since generation; zero if the stored timestamp lies in the future.
    pub fn age(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.generated_at)
            .unwrap_or_default()
    }

    pub fn total_stars(&self) -> u32 {
        self.puzzles.iter().map(|p| p.stars as u32).sum()
    }

    /// Anything loaded from storage must pass this before use.
    pub fn is_usable_for(&self, seed: &str) -> bool {
        self.seed == seed
            && self.puzzles.len() == DAILY_PUZZLE_COUNT
            && self.current_puzzle_index < self.puzzles.len()
            && self
                .puzzles
                .iter()
                .enumerate()
                .all(|(index, puzzle)| puzzle.is_well_formed(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(id: usize) -> DailyPuzzle {
        DailyPuzzle::new(
            id,
            NumberSet::from_numbers(&[1, 2, 3, 4, 5, 6]),
            21,
            vec!["1 + 2 = 3".to_string()],
        )
    }

    fn puzzle_set(seed: &str) -> DailyPuzzleSet {
        DailyPuzzleSet::new(
            seed.to_string(),
            (0..DAILY_PUZZLE_COUNT).map(puzzle).collect(),
        )
    }

    #[test]
    fn test_record_stars_only_raises() {
        let mut puzzle = puzzle(0);
        assert!(puzzle.record_stars(2));
        assert!(!puzzle.record_stars(1));
        assert_eq!(puzzle.stars, 2);
        assert!(!puzzle.record_stars(2));
        assert!(puzzle.record_stars(3));
        assert_eq!(puzzle.stars, 3);
    }

    #[test]
    fn test_no_stars_after_solution_shown() {
        let mut puzzle = puzzle(0);
        puzzle.solution_shown = true;
        assert!(!puzzle.record_stars(3));
        assert_eq!(puzzle.stars, 0);
        assert!(!puzzle.can_earn_stars());
    }

    #[test]
    fn test_usable_for_checks_seed_and_shape() {
        let set = puzzle_set("2026-10-16");
        assert!(set.is_usable_for("2026-10-16"));
        assert!(!set.is_usable_for("2026-10-17"));

        let mut bad_index = set.clone();
        bad_index.current_puzzle_index = DAILY_PUZZLE_COUNT;
        assert!(!bad_index.is_usable_for("2026-10-16"));

        let mut short = set.clone();
        short.puzzles.pop();
        assert!(!short.is_usable_for("2026-10-16"));

        let mut tampered = set.clone();
        tampered.puzzles[2].stars = 9;
        assert!(!tampered.is_usable_for("2026-10-16"));
    }

    #[test]
    fn test_persisted_shape_uses_camel_case() {
        let set = puzzle_set("seed");
        let value = serde_json::to_value(&set).unwrap();
        assert!(value.get("currentPuzzleIndex").is_some());
        assert!(value["puzzles"][0].get("numberSet").is_some());
        assert!(value["puzzles"][0].get("solutionShown").is_some());

        let parsed: DailyPuzzleSet = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.puzzles, set.puzzles);
    }

    #[test]
    fn test_generated_at_persists_as_seconds() {
        let mut set = puzzle_set("seed");
        set.generated_at = SystemTime::now() - Duration::from_secs(2 * 3600);
        assert!(set.age() >= Duration::from_secs(2 * 3600));

        let value = serde_json::to_value(&set).unwrap();
        assert!(value["generatedAt"].is_u64());
        let parsed: DailyPuzzleSet = serde_json::from_value(value).unwrap();
        assert!(parsed.age() >= Duration::from_secs(2 * 3600));

        set.generated_at = SystemTime::now() + Duration::from_secs(60);
        assert_eq!(set.age(), Duration::ZERO);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = r#"{
            "seed": "s",
            "currentPuzzleIndex": 0,
            "puzzles": [{"id": 0, "numberSet": [1,2,3,4,5,6], "target": 7, "solution": []}]
        }"#;
        let parsed: DailyPuzzleSet = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.puzzles[0].stars, 0);
        assert!(!parsed.puzzles[0].solution_shown);
    }
}
