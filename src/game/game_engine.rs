use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, error, info, trace};
use rand::Rng;
use uuid::Uuid;

use super::puzzle_generator::generate_puzzle_set;
use super::scoring::current_stars;
use super::settings::Settings;
use super::stats_manager::StatsManager;
use super::store::{load_record, save_record, SharedStore, PUZZLE_SET_KEY};
use crate::destroyable::Destroyable;
use crate::events::{EventEmitter, EventHandler, EventObserver, Unsubscriber};
use crate::model::{
    BoardState, Calendar, Collection, DailyPuzzle, DailyPuzzleSet, GameEngineCommand,
    GameEngineEvent, GameStatistics, Operator, SlotOutcome,
};

/// The play session: today's puzzle set, the board for the active puzzle and the statistics.
///
/// Built once from the store; every mutation goes through the operations below and is
/// saved before the operation returns.
pub struct GameEngine {
    store: SharedStore,
    calendar: Calendar,
    puzzle_set: DailyPuzzleSet,
    board: BoardState,
    stats: StatsManager,
    current_playthrough_id: Uuid,
    debug_mode: bool,
    subscription: Option<Unsubscriber<GameEngineCommand>>,
    game_engine_event_emitter: EventEmitter<GameEngineEvent>,
}

impl Destroyable for GameEngine {
    fn destroy(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}

impl EventHandler<GameEngineCommand> for GameEngine {
    fn handle_event(&mut self, event: &GameEngineCommand) {
        self.handle_command(event.clone());
    }
}

/// Today's set from the store, or a freshly generated one when the stored set is
/// missing, malformed or belongs to another seed.
fn load_or_generate_puzzle_set(store: &SharedStore, seed: &str, calendar: &Calendar) -> DailyPuzzleSet {
    let loaded = load_record::<DailyPuzzleSet>(&*store.borrow(), PUZZLE_SET_KEY);
    if let Some(puzzle_set) = loaded {
        if puzzle_set.is_usable_for(seed) {
            return puzzle_set;
        }
        debug!(
            target: "game_engine",
            "Stored puzzle set {:?} ({}s old) does not match seed {:?}; regenerating",
            puzzle_set.seed,
            puzzle_set.age().as_secs(),
            seed
        );
    }

    let puzzle_set = generate_puzzle_set(Some(seed), calendar);
    if let Err(err) = save_record(&mut *store.borrow_mut(), PUZZLE_SET_KEY, &puzzle_set) {
        error!(target: "game_engine", "Failed to save puzzle set: {}", err);
    }
    puzzle_set
}

impl GameEngine {
    /// `seed_override` replaces today's key as the daily seed.
    pub fn new(
        store: SharedStore,
        calendar: Calendar,
        seed_override: Option<String>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let seed = seed_override.unwrap_or_else(|| calendar.today_key());
        let puzzle_set = load_or_generate_puzzle_set(&store, &seed, &calendar);
        let stats = StatsManager::load(store.clone(), calendar.today());
        let board = BoardState::new(puzzle_set.current().number_set);

        let engine = Self {
            store,
            calendar,
            puzzle_set,
            board,
            stats,
            current_playthrough_id: Uuid::new_v4(),
            debug_mode: Settings::is_debug_mode(),
            subscription: None,
            game_engine_event_emitter,
        };
        engine.log_solutions();

        let refcell = Rc::new(RefCell::new(engine));
        GameEngine::wire_subscription(refcell.clone(), game_engine_command_observer);
        refcell
    }

    /// Reads settings from the store and overrides from the environment.
    pub fn from_env(
        store: SharedStore,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
        game_engine_event_emitter: EventEmitter<GameEngineEvent>,
    ) -> Rc<RefCell<Self>> {
        let settings = Settings::load(&store);
        GameEngine::new(
            store,
            settings.calendar(),
            Settings::seed_from_env(),
            game_engine_command_observer,
            game_engine_event_emitter,
        )
    }

    fn wire_subscription(
        game_engine: Rc<RefCell<Self>>,
        game_engine_command_observer: EventObserver<GameEngineCommand>,
    ) {
        let handler = game_engine.clone();
        let subscription = game_engine_command_observer.subscribe(move |command| {
            handler.borrow_mut().handle_event(command);
        });
        game_engine.borrow_mut().subscription = Some(subscription);
    }

    pub fn handle_command(&mut self, command: GameEngineCommand) {
        trace!(target: "game_engine", "Handling command: {:?}", command);
        match command {
            GameEngineCommand::SelectSlot(position) => self.select_slot(position),
            GameEngineCommand::SelectOperator(operator) => self.select_operator(operator),
            GameEngineCommand::Undo => self.undo(),
            GameEngineCommand::Collect => {
                self.collect();
            }
            GameEngineCommand::ShowSolution => {
                self.show_solution();
            }
            GameEngineCommand::Restart => self.restart(),
            GameEngineCommand::SwitchPuzzle(index) => self.switch_puzzle(index),
            GameEngineCommand::NewPuzzleSet(seed) => self.new_puzzle_set(seed),
            GameEngineCommand::ResetStatistics => self.reset_statistics(),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn puzzle_set(&self) -> &DailyPuzzleSet {
        &self.puzzle_set
    }

    pub fn current_puzzle(&self) -> &DailyPuzzle {
        self.puzzle_set.current()
    }

    pub fn statistics(&self) -> &GameStatistics {
        self.stats.stats()
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.current_playthrough_id
    }

    pub fn earned_stars(&self) -> u8 {
        current_stars(&self.board, self.puzzle_set.current())
    }

    pub fn select_slot(&mut self, position: usize) {
        match self.board.select_slot(position) {
            SlotOutcome::Ignored => return,
            SlotOutcome::Rejected { position, reason } => {
                debug!(target: "game_engine", "Move into slot {} rejected: {}", position, reason);
                self.game_engine_event_emitter
                    .emit(GameEngineEvent::MoveRejected { position, reason });
            }
            SlotOutcome::Applied(record) => {
                trace!(target: "game_engine", "Move {}: {}", self.board.current_move_index(), record);
            }
            SlotOutcome::Selected(_) | SlotOutcome::Deselected => (),
        }
        self.sync_board();
    }

    pub fn select_operator(&mut self, operator: Operator) {
        self.board.select_operator(operator);
        self.sync_board();
    }

    pub fn undo(&mut self) {
        self.board.undo();
        self.sync_board();
    }

    /// Banks the current rating. Returns `None` when there is nothing to bank.
    pub fn collect(&mut self) -> Option<Collection> {
        let puzzle_index = self.puzzle_set.current_puzzle_index;
        if !self.puzzle_set.current().can_earn_stars() {
            debug!(target: "game_engine", "Puzzle {} forfeited; not collecting", puzzle_index);
            return None;
        }
        let stars = self.earned_stars();
        if stars == 0 {
            return None;
        }

        let improved = self.puzzle_set.current_mut().record_stars(stars);
        if improved {
            self.save_puzzle_set();
            self.game_engine_event_emitter
                .emit(GameEngineEvent::PuzzleSetUpdated(self.puzzle_set.clone()));
        }

        // only today's set counts towards statistics; practice and overridden seeds do not
        let today = self.calendar.today_key();
        if self.puzzle_set.seed == today {
            let stats = self
                .stats
                .record_collection(&today, puzzle_index, stars, self.calendar.today())
                .clone();
            self.game_engine_event_emitter
                .emit(GameEngineEvent::StatisticsUpdated(stats));
        } else {
            debug!(
                target: "game_engine",
                "Puzzle set {:?} is not today's; statistics unchanged",
                self.puzzle_set.seed
            );
        }

        let collection = Collection {
            puzzle_index,
            stars,
            best_stars: self.puzzle_set.current().stars,
            improved,
            playthrough_id: self.current_playthrough_id,
        };
        info!(
            target: "game_engine",
            "Collected {} stars on puzzle {} (best {})",
            stars,
            puzzle_index,
            collection.best_stars
        );
        self.game_engine_event_emitter
            .emit(GameEngineEvent::PuzzleCollected(collection.clone()));
        Some(collection)
    }

    /// Reveals the reference solution. The puzzle can earn no more stars afterwards.
    pub fn show_solution(&mut self) -> Vec<String> {
        let puzzle_index = self.puzzle_set.current_puzzle_index;
        let puzzle = self.puzzle_set.current_mut();
        let newly_shown = !puzzle.solution_shown;
        puzzle.solution_shown = true;
        let solution = puzzle.solution.clone();

        if newly_shown {
            info!(target: "game_engine", "Solution shown for puzzle {}", puzzle_index);
            self.save_puzzle_set();
            self.game_engine_event_emitter
                .emit(GameEngineEvent::PuzzleSetUpdated(self.puzzle_set.clone()));
        }
        self.game_engine_event_emitter
            .emit(GameEngineEvent::SolutionRevealed {
                puzzle_index,
                solution: solution.clone(),
            });
        solution
    }

    /// Back to move 0 of the current puzzle.
    pub fn restart(&mut self) {
        self.reset_board();
    }

    pub fn switch_puzzle(&mut self, index: usize) {
        if index >= self.puzzle_set.puzzles.len() {
            debug!(target: "game_engine", "No puzzle at index {}", index);
            return;
        }
        if index != self.puzzle_set.current_puzzle_index {
            self.puzzle_set.current_puzzle_index = index;
            self.save_puzzle_set();
            self.game_engine_event_emitter
                .emit(GameEngineEvent::PuzzleSetUpdated(self.puzzle_set.clone()));
        }
        self.reset_board();
    }

    /// Replaces the set with a practice set. A random seed is drawn when none is given.
    pub fn new_puzzle_set(&mut self, seed: Option<String>) {
        let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>().to_string());
        self.puzzle_set = generate_puzzle_set(Some(&seed), &self.calendar);
        self.log_solutions();
        self.save_puzzle_set();
        self.game_engine_event_emitter
            .emit(GameEngineEvent::PuzzleSetUpdated(self.puzzle_set.clone()));
        self.reset_board();
    }

    pub fn reset_statistics(&mut self) {
        let stats = self.stats.reset().clone();
        info!(target: "game_engine", "Statistics reset");
        self.game_engine_event_emitter
            .emit(GameEngineEvent::StatisticsUpdated(stats));
    }

    fn reset_board(&mut self) {
        self.board = BoardState::new(self.puzzle_set.current().number_set);
        self.current_playthrough_id = Uuid::new_v4();
        self.sync_board();
    }

    fn save_puzzle_set(&self) {
        if let Err(err) = save_record(&mut *self.store.borrow_mut(), PUZZLE_SET_KEY, &self.puzzle_set) {
            error!(target: "game_engine", "Failed to save puzzle set: {}", err);
        }
    }

    fn sync_board(&self) {
        self.game_engine_event_emitter
            .emit(GameEngineEvent::BoardUpdated {
                board: self.board.clone(),
                earned_stars: self.earned_stars(),
            });
    }

    fn log_solutions(&self) {
        if !self.debug_mode {
            return;
        }
        for puzzle in &self.puzzle_set.puzzles {
            info!(
                target: "game_engine",
                "Puzzle {} ({}): target {} via {:?}",
                puzzle.id,
                self.puzzle_set.seed,
                puzzle.target,
                puzzle.solution
            );
        }
    }
}
