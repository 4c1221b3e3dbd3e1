use super::Operator;

/// Player actions, as the presentation layer sends them to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    SelectSlot(usize),
    SelectOperator(Operator),
    Undo,
    Collect,
    ShowSolution,
    Restart,
    SwitchPuzzle(usize),
    NewPuzzleSet(Option<String>), // seed; random when None
    ResetStatistics,
}
