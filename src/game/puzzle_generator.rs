use log::{debug, trace, warn};

use super::seeded_random::{seeded_index, seeded_shuffle};
use crate::model::{
    Calendar, DailyPuzzle, DailyPuzzleSet, MoveRecord, NumberSet, Operator, DAILY_PUZZLE_COUNT,
    NUMBER_SET_SIZE,
};

pub const NUMBER_MIN: i64 = 1;
pub const NUMBER_MAX: i64 = 15;
/// Accepted intermediate results lie strictly between these bounds.
pub const TARGET_LOWER_BOUND: i64 = -25;
pub const TARGET_UPPER_BOUND: i64 = 50;

const MAX_NUMBER_DRAWS: usize = 100;
const MAX_OPERATOR_ATTEMPTS: usize = 50;

// division is drawn three times as often; most random divisions are rejected
const OPERATOR_TABLE: [Operator; 6] = [
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
    Operator::Divide,
    Operator::Divide,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAndSolution {
    pub target: i64,
    pub solution: Vec<MoveRecord>,
}

fn within_band(value: i64) -> bool {
    value > TARGET_LOWER_BOUND && value < TARGET_UPPER_BOUND
}

/// Six distinct numbers in `NUMBER_MIN..=NUMBER_MAX`, ascending.
///
/// If the draw budget runs out, the smallest unused values fill the remaining slots.
pub fn generate_number_set(seed: &str) -> NumberSet {
    let span = (NUMBER_MAX - NUMBER_MIN + 1) as usize;
    let mut numbers: Vec<i64> = Vec::with_capacity(NUMBER_SET_SIZE);

    for draw in 0..MAX_NUMBER_DRAWS {
        if numbers.len() == NUMBER_SET_SIZE {
            break;
        }
        let candidate = NUMBER_MIN + seeded_index(&format!("{seed}-number-{draw}"), span) as i64;
        if !numbers.contains(&candidate) {
            numbers.push(candidate);
        }
    }

    if numbers.len() < NUMBER_SET_SIZE {
        warn!(
            target: "generator",
            "Draw budget exhausted for seed {:?} with {} numbers; filling",
            seed,
            numbers.len()
        );
        let missing = NUMBER_SET_SIZE - numbers.len();
        let fill: Vec<i64> = (NUMBER_MIN..=NUMBER_MAX)
            .filter(|n| !numbers.contains(n))
            .take(missing)
            .collect();
        numbers.extend(fill);
    }

    numbers.sort_unstable();
    NumberSet::from_numbers(&numbers)
}

/// Draws an operator until `running op number` is an integer inside the band.
/// Falls back to addition, regardless of the band, when the attempt budget runs out.
fn pick_operation(running: i64, number: i64, seed: &str, step: usize) -> MoveRecord {
    for attempt in 0..MAX_OPERATOR_ATTEMPTS {
        let index = seeded_index(&format!("{seed}-op-{step}-{attempt}"), OPERATOR_TABLE.len());
        let operator = OPERATOR_TABLE[index];
        if let Ok(result) = operator.apply(running, number) {
            if within_band(result) {
                return MoveRecord::new(running, operator, number, result);
            }
        }
    }

    let result = running.saturating_add(number);
    debug!(
        target: "generator",
        "No operator in band for {} and {} (seed {:?}); using addition",
        running,
        number,
        seed
    );
    MoveRecord::new(running, Operator::Add, number, result)
}

/// Shuffles the numbers, then folds them left to right into a target.
pub fn generate_target_and_solution(number_set: &NumberSet, seed: &str) -> TargetAndSolution {
    let mut order: Vec<i64> = number_set.values().collect();
    seeded_shuffle(&mut order, seed);

    let Some((&first, rest)) = order.split_first() else {
        return TargetAndSolution {
            target: 0,
            solution: Vec::new(),
        };
    };

    let mut running = first;
    let mut solution = Vec::with_capacity(rest.len());
    for (step, &number) in rest.iter().enumerate() {
        let record = pick_operation(running, number, seed, step + 1);
        running = record.result;
        solution.push(record);
    }

    TargetAndSolution {
        target: running,
        solution,
    }
}

pub fn generate_puzzle(day_seed: &str, index: usize) -> DailyPuzzle {
    let seed = format!("{day_seed}-puzzle-{index}");
    let number_set = generate_number_set(&seed);
    let TargetAndSolution { target, solution } = generate_target_and_solution(&number_set, &seed);
    trace!(
        target: "generator",
        "Puzzle {} for {:?}: {} -> {}",
        index,
        day_seed,
        number_set,
        target
    );
    DailyPuzzle::new(
        index,
        number_set,
        target,
        solution.iter().map(|m| m.to_string()).collect(),
    )
}

/// The day's puzzles. Same seed, same puzzles.
pub fn generate_daily_puzzles(seed: &str) -> Vec<DailyPuzzle> {
    (0..DAILY_PUZZLE_COUNT)
        .map(|index| generate_puzzle(seed, index))
        .collect()
}

/// A fresh set for `seed`, or for today's key in `calendar` when no seed is given.
pub fn generate_puzzle_set(seed: Option<&str>, calendar: &Calendar) -> DailyPuzzleSet {
    let seed = seed
        .map(str::to_string)
        .unwrap_or_else(|| calendar.today_key());
    let puzzles = generate_daily_puzzles(&seed);
    debug!(target: "generator", "Generated {} puzzles for seed {:?}", puzzles.len(), seed);
    DailyPuzzleSet::new(seed, puzzles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::UsingLogger;
    use chrono::{DateTime, Utc};
    use itertools::Itertools;
    use test_context::test_context;

    #[test]
    fn test_generation_is_deterministic() {
        let first = generate_daily_puzzles("2026-10-16");
        let second = generate_daily_puzzles("2026-10-16");
        assert_eq!(first, second);
        assert_eq!(first.len(), DAILY_PUZZLE_COUNT);
        assert_ne!(first, generate_daily_puzzles("2026-10-17"));
    }

    #[test]
    fn test_known_daily_puzzles() {
        let puzzles = generate_daily_puzzles("2026-10-16");
        let expected: [(&[i64], i64, &[&str]); DAILY_PUZZLE_COUNT] = [
            (
                &[2, 4, 6, 8, 9, 10],
                31,
                &["6 - 4 = 2", "2 × 8 = 16", "16 × 2 = 32", "32 + 9 = 41", "41 - 10 = 31"],
            ),
            (
                &[6, 8, 10, 11, 14, 15],
                16,
                &["11 - 14 = -3", "-3 + 15 = 12", "12 + 6 = 18", "18 + 8 = 26", "26 - 10 = 16"],
            ),
            (
                &[4, 5, 7, 9, 10, 13],
                11,
                &["9 + 13 = 22", "22 + 5 = 27", "27 + 10 = 37", "37 + 7 = 44", "44 ÷ 4 = 11"],
            ),
            (
                &[1, 4, 8, 10, 11, 13],
                27,
                &["4 + 1 = 5", "5 + 8 = 13", "13 - 10 = 3", "3 + 11 = 14", "14 + 13 = 27"],
            ),
            (
                &[3, 7, 8, 12, 13, 15],
                13,
                &["3 - 15 = -12", "-12 + 13 = 1", "1 × 12 = 12", "12 - 7 = 5", "5 + 8 = 13"],
            ),
        ];

        for (puzzle, (numbers, target, solution)) in puzzles.iter().zip(expected) {
            assert_eq!(puzzle.number_set, NumberSet::from_numbers(numbers));
            assert_eq!(puzzle.target, target);
            assert_eq!(puzzle.solution, solution);
        }
    }

    #[test]
    fn test_puzzles_within_a_day_differ() {
        let puzzles = generate_daily_puzzles("2026-10-16");
        let distinct_sets = puzzles.iter().map(|p| p.number_set).unique().count();
        assert!(distinct_sets > 1);
        for (index, puzzle) in puzzles.iter().enumerate() {
            assert_eq!(puzzle.id, index);
            assert_eq!(puzzle.stars, 0);
            assert!(!puzzle.solution_shown);
        }
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_number_sets_are_distinct_sorted_and_in_range(_: &mut UsingLogger) {
        for day in 1..=60 {
            let set = generate_number_set(&format!("2026-01-{day}"));
            let values: Vec<i64> = set.values().collect();
            assert_eq!(values.len(), NUMBER_SET_SIZE);
            assert!(values.iter().all(|v| (NUMBER_MIN..=NUMBER_MAX).contains(v)));
            assert!(values.windows(2).all(|w| w[0] < w[1]), "{values:?}");
        }
    }

    #[test]
    fn test_solution_is_a_chain_over_every_number() {
        for day in 0..40 {
            let seed = format!("chain-{day}");
            let set = generate_number_set(&seed);
            let TargetAndSolution { target, solution } =
                generate_target_and_solution(&set, &seed);

            assert_eq!(solution.len(), NUMBER_SET_SIZE - 1);
            assert!(solution
                .iter()
                .tuple_windows()
                .all(|(prev, next)| next.left == prev.result));
            assert_eq!(solution.last().map(|m| m.result), Some(target));

            let mut used: Vec<i64> = solution.iter().map(|m| m.right).collect();
            used.push(solution[0].left);
            used.sort_unstable();
            assert_eq!(used, set.values().collect::<Vec<_>>());

            for record in &solution {
                assert_eq!(record.operator.apply(record.left, record.right), Ok(record.result));
            }
        }
    }

    #[test]
    fn test_steps_stay_in_band_unless_falling_back() {
        for day in 0..40 {
            let seed = format!("band-{day}");
            let set = generate_number_set(&seed);
            let outcome = generate_target_and_solution(&set, &seed);
            for record in &outcome.solution {
                assert!(within_band(record.result) || record.operator == Operator::Add);
            }
        }
    }

    #[test]
    fn test_fallback_is_addition() {
        // 10000 op 7 is out of band or fractional for every operator
        let record = pick_operation(10_000, 7, "fallback", 1);
        assert_eq!(record, MoveRecord::new(10_000, Operator::Add, 7, 10_007));
    }

    #[test]
    fn test_solution_strings_match_records() {
        let puzzle = generate_puzzle("2026-10-16", 0);
        let seed = "2026-10-16-puzzle-0";
        let outcome = generate_target_and_solution(&puzzle.number_set, seed);
        let rendered: Vec<String> = outcome.solution.iter().map(|m| m.to_string()).collect();
        assert_eq!(puzzle.solution, rendered);
        assert_eq!(puzzle.target, outcome.target);
    }

    #[test]
    fn test_default_seed_comes_from_calendar() {
        let instant = DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let calendar = Calendar::utc().pinned(instant);
        let set = generate_puzzle_set(None, &calendar);
        assert_eq!(set.seed, "2026-10-16");
        assert_eq!(set.puzzles, generate_daily_puzzles("2026-10-16"));
        assert_eq!(set.current_puzzle_index, 0);

        let practice = generate_puzzle_set(Some("practice"), &calendar);
        assert_eq!(practice.seed, "practice");
    }
}
