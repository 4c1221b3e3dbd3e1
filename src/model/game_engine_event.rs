use uuid::Uuid;

use super::{BoardState, DailyPuzzleSet, GameStatistics, MoveError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub puzzle_index: usize,
    pub stars: u8,
    pub best_stars: u8,
    pub improved: bool,
    pub playthrough_id: Uuid,
}

#[derive(Debug, Clone)]
pub enum GameEngineEvent {
    BoardUpdated {
        board: BoardState,
        earned_stars: u8,
    },
    /// Transient; the presentation layer flashes `position` and forgets it.
    MoveRejected {
        position: usize,
        reason: MoveError,
    },
    PuzzleSetUpdated(DailyPuzzleSet),
    PuzzleCollected(Collection),
    SolutionRevealed {
        puzzle_index: usize,
        solution: Vec<String>,
    },
    StatisticsUpdated(GameStatistics),
}
