pub mod game_engine;
pub mod puzzle_generator;
pub mod scoring;
pub mod seeded_random;
pub mod settings;
pub mod stats_manager;
pub mod store;

pub use game_engine::GameEngine;
pub use puzzle_generator::{generate_daily_puzzles, generate_puzzle_set};
pub use scoring::current_stars;
pub use seeded_random::seeded_random;
pub use settings::Settings;
pub use stats_manager::StatsManager;
pub use store::{JsonFileStore, MemoryStore, SharedStore, Store, StoreError};
