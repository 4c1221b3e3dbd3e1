use log::trace;

use super::{MoveError, MoveRecord, NumberSet, Operator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub value: i64,
    pub position: usize,
}

/// What a slot selection did to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotOutcome {
    Ignored,
    Selected(Operand),
    Deselected,
    Applied(MoveRecord),
    Rejected { position: usize, reason: MoveError },
}

/// Per-puzzle play state.
///
/// `number_set_history` always holds one snapshot more than `move_history` and
/// `position_history`; the current move index is derived from that, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    number_set_history: Vec<NumberSet>,
    move_history: Vec<MoveRecord>,
    position_history: Vec<usize>,
    first_operand: Option<Operand>,
    pending_operator: Option<Operator>,
}

impl BoardState {
    pub fn new(initial: NumberSet) -> Self {
        Self {
            number_set_history: vec![initial],
            move_history: Vec::new(),
            position_history: Vec::new(),
            first_operand: None,
            pending_operator: None,
        }
    }

    pub fn current(&self) -> &NumberSet {
        // never empty: constructed with the initial snapshot and undo stops at it
        &self.number_set_history[self.current_move_index()]
    }

    pub fn current_move_index(&self) -> usize {
        self.move_history.len()
    }

    pub fn number_set_history(&self) -> &[NumberSet] {
        &self.number_set_history
    }

    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    pub fn position_history(&self) -> &[usize] {
        &self.position_history
    }

    pub fn first_operand(&self) -> Option<Operand> {
        self.first_operand
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    pub fn selected_value(&self) -> Option<i64> {
        self.first_operand
            .and_then(|operand| self.current().get(operand.position))
    }

    pub fn rendered_moves(&self) -> Vec<String> {
        self.move_history.iter().map(|m| m.to_string()).collect()
    }

    fn clear_selection(&mut self) {
        self.first_operand = None;
        self.pending_operator = None;
    }

    pub fn select_slot(&mut self, position: usize) -> SlotOutcome {
        let Some(value) = self.current().get(position) else {
            return SlotOutcome::Ignored;
        };

        if self.first_operand.map(|o| o.position) == Some(position) {
            self.clear_selection();
            return SlotOutcome::Deselected;
        }

        match (self.first_operand, self.pending_operator) {
            (Some(_), Some(_)) => match self.apply_operation(value, position) {
                Ok(record) => SlotOutcome::Applied(record),
                Err(reason) => SlotOutcome::Rejected { position, reason },
            },
            _ => {
                let operand = Operand { value, position };
                self.first_operand = Some(operand);
                self.pending_operator = None;
                SlotOutcome::Selected(operand)
            }
        }
    }

    /// Re-selecting the pending operator clears it; a different operator replaces it.
    pub fn select_operator(&mut self, operator: Operator) {
        if self.first_operand.is_none() {
            self.pending_operator = None;
            return;
        }
        if self.pending_operator == Some(operator) {
            self.pending_operator = None;
        } else {
            self.pending_operator = Some(operator);
        }
    }

    /// Combines the selected operand with the one at `second_position`.
    ///
    /// On failure only the pending operator is cleared; the first operand stays selected.
    pub fn apply_operation(
        &mut self,
        second: i64,
        second_position: usize,
    ) -> Result<MoveRecord, MoveError> {
        let (Some(first), Some(operator)) = (self.first_operand, self.pending_operator) else {
            self.pending_operator = None;
            return Err(MoveError::MissingOperand);
        };
        if second_position == first.position || self.current().get(second_position) != Some(second)
        {
            self.pending_operator = None;
            return Err(MoveError::InvalidSlot(second_position));
        }

        let result = match operator.apply(first.value, second) {
            Ok(result) => result,
            Err(err) => {
                trace!(target: "board", "Rejected {} {} {}: {}", first.value, operator, second, err);
                self.pending_operator = None;
                return Err(err);
            }
        };

        let next = self
            .current()
            .combine(first.position, second_position, result);
        let record = MoveRecord::new(first.value, operator, second, result);
        self.number_set_history.push(next);
        self.move_history.push(record);
        self.position_history.push(first.position);

        self.first_operand = Some(Operand {
            value: result,
            position: second_position,
        });
        self.pending_operator = None;
        trace!(target: "board", "Applied {}; board {}", record, next);
        Ok(record)
    }

    /// Pops the last snapshot. Returns `false` when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.move_history.is_empty() {
            self.clear_selection();
            return false;
        }

        self.number_set_history.pop();
        self.move_history.pop();
        let consumed = self.position_history.pop();

        self.pending_operator = None;
        self.first_operand = consumed.and_then(|position| {
            self.current()
                .get(position)
                .map(|value| Operand { value, position })
        });
        true
    }
}
