mod board_state;
pub mod calendar;
mod daily_puzzle;
mod game_engine_command;
mod game_engine_event;
mod game_stats;
mod move_record;
mod number_set;
mod operator;

pub use board_state::{BoardState, Operand, SlotOutcome};
pub use calendar::Calendar;
pub use daily_puzzle::{DailyPuzzle, DailyPuzzleSet, DAILY_PUZZLE_COUNT, MAX_STARS};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{Collection, GameEngineEvent};
pub use game_stats::{DayStats, GameStatistics};
pub use move_record::MoveRecord;
pub use number_set::{NumberSet, NUMBER_SET_SIZE};
pub use operator::{MoveError, Operator};
