use itertools::Itertools;

use crate::model::{BoardState, DailyPuzzle, MoveRecord, MAX_STARS, NUMBER_SET_SIZE};

/// Moves needed to consume every number on the board.
pub const FULL_USE_MOVES: usize = NUMBER_SET_SIZE - 1;

/// True when every move after the first consumes the previous move's result.
///
/// Only a full-use sequence can count as a chain.
pub fn is_chain(moves: &[MoveRecord]) -> bool {
    moves.len() == FULL_USE_MOVES
        && moves
            .iter()
            .tuple_windows()
            .all(|(prev, next)| next.left == prev.result)
}

pub fn stars_for(selected: Option<i64>, moves: &[MoveRecord], target: i64) -> u8 {
    match selected {
        Some(value) if value == target => {
            if moves.len() < FULL_USE_MOVES {
                1
            } else if is_chain(moves) {
                MAX_STARS
            } else {
                2
            }
        }
        _ => 0,
    }
}

/// Rating the board would earn if collected now.
pub fn current_stars(board: &BoardState, puzzle: &DailyPuzzle) -> u8 {
    stars_for(board.selected_value(), board.move_history(), puzzle.target)
}
