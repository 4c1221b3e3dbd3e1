use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{trace, warn};
use serde::{Deserialize, Serialize};

use super::calendar::{format_day_key, parse_day_key};
use super::{DAILY_PUZZLE_COUNT, MAX_STARS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub date: String,
    pub puzzle_stars: [u8; DAILY_PUZZLE_COUNT],
    #[serde(default)]
    pub total_stars: u32,
    #[serde(default)]
    pub is_perfect: bool,
}

impl DayStats {
    pub fn new(date: &str) -> Self {
        Self {
            date: date.to_string(),
            puzzle_stars: [0; DAILY_PUZZLE_COUNT],
            total_stars: 0,
            is_perfect: false,
        }
    }

    fn recompute(&mut self) {
        self.total_stars = self.puzzle_stars.iter().map(|&s| s as u32).sum();
        self.is_perfect = self.puzzle_stars.iter().all(|&s| s == MAX_STARS);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameStatistics {
    pub days_played: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub perfect_days: u32,
    pub total_stars: u32,
    /// Every puzzle slot of every recorded day; an uncollected slot is a 0-star game.
    pub games_played: u32,
    /// `star_distribution[n]` counts games whose best rating is `n` stars.
    pub star_distribution: [u32; MAX_STARS as usize + 1],
    pub last_played_date: Option<String>,
    pub daily_stats: BTreeMap<String, DayStats>,
}

impl GameStatistics {
    /// Folds one collected rating into the day's record and every aggregate.
    ///
    /// Ratings only ever rise. An unparsable date or out-of-range slot is ignored.
    /// The streak is counted back from `today`, whatever day `date` is.
    pub fn record_collection(
        &mut self,
        date: &str,
        puzzle_index: usize,
        stars: u8,
        today: NaiveDate,
    ) {
        let Some(day) = parse_day_key(date) else {
            warn!(target: "stats", "Ignoring collection for unparsable date {:?}", date);
            return;
        };
        if puzzle_index >= DAILY_PUZZLE_COUNT {
            warn!(target: "stats", "Ignoring collection for puzzle index {}", puzzle_index);
            return;
        }

        let entry = self
            .daily_stats
            .entry(date.to_string())
            .or_insert_with(|| DayStats::new(date));
        let slot = &mut entry.puzzle_stars[puzzle_index];
        *slot = (*slot).max(stars.min(MAX_STARS));
        entry.recompute();

        self.refold();
        let last_played = self.last_played_date.as_deref().and_then(parse_day_key);
        if last_played.map_or(true, |last| day > last) {
            self.last_played_date = Some(date.to_string());
        }
        self.refresh_streak(today);
        trace!(
            target: "stats",
            "Recorded {} stars for puzzle {} on {}; streak {}",
            stars,
            puzzle_index,
            date,
            self.current_streak
        );
    }

    /// Recomputes every aggregate from `daily_stats`.
    pub fn refold(&mut self) {
        for day in self.daily_stats.values_mut() {
            day.recompute();
        }
        self.days_played = self.daily_stats.len() as u32;
        self.total_stars = self.daily_stats.values().map(|d| d.total_stars).sum();
        self.perfect_days = self.daily_stats.values().filter(|d| d.is_perfect).count() as u32;

        self.star_distribution = Default::default();
        for stars in self.daily_stats.values().flat_map(|d| d.puzzle_stars) {
            self.star_distribution[stars.min(MAX_STARS) as usize] += 1;
        }
        self.games_played = self.star_distribution.iter().sum();
    }

    pub fn streak_ending_at(&self, day: NaiveDate) -> u32 {
        let mut streak = 0;
        let mut cursor = Some(day);
        while let Some(date) = cursor {
            if !self.daily_stats.contains_key(&format_day_key(date)) {
                break;
            }
            streak += 1;
            cursor = date.pred_opt();
        }
        streak
    }

    /// A streak stays alive through today as long as yesterday was played.
    pub fn refresh_streak(&mut self, today: NaiveDate) {
        let anchor = [Some(today), today.pred_opt()]
            .into_iter()
            .flatten()
            .find(|d| self.daily_stats.contains_key(&format_day_key(*d)));
        self.current_streak = anchor.map(|d| self.streak_ending_at(d)).unwrap_or(0);
        self.best_streak = self.best_streak.max(self.current_streak);
    }

    /// Entries keyed by something other than a real date, or whose key disagrees with
    /// their own `date`, make the whole record suspect.
    pub fn is_well_formed(&self) -> bool {
        self.daily_stats.iter().all(|(key, day)| {
            parse_day_key(key).is_some()
                && *key == day.date
                && day.puzzle_stars.iter().all(|&s| s <= MAX_STARS)
        }) && self
            .last_played_date
            .as_deref()
            .map_or(true, |d| parse_day_key(d).is_some())
    }
}
