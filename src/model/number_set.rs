use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub const NUMBER_SET_SIZE: usize = 6;

/// The six board slots. A consumed slot is `None`; the slot count never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumberSet([Option<i64>; NUMBER_SET_SIZE]);

impl NumberSet {
    pub fn new(slots: [Option<i64>; NUMBER_SET_SIZE]) -> Self {
        Self(slots)
    }

    /// Builds a full set from up to six numbers; missing trailing slots stay empty.
    pub fn from_numbers(numbers: &[i64]) -> Self {
        let mut slots = [None; NUMBER_SET_SIZE];
        for (slot, &n) in slots.iter_mut().zip(numbers) {
            *slot = Some(n);
        }
        Self(slots)
    }

    pub fn get(&self, position: usize) -> Option<i64> {
        self.0.get(position).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<i64>; NUMBER_SET_SIZE] {
        &self.0
    }

    pub fn values(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().flatten().copied()
    }

    pub fn remaining(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    /// Empties `consumed` and writes `result` into `target`.
    pub(crate) fn combine(&self, consumed: usize, target: usize, result: i64) -> Self {
        let mut next = *self;
        next.0[consumed] = None;
        next.0[target] = Some(result);
        next
    }
}

impl Display for NumberSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "|")?;
        for slot in self.0.iter() {
            match slot {
                Some(n) => write!(f, "{:>4}|", n)?,
                None => write!(f, "{:>4}|", "_")?,
            }
        }
        Ok(())
    }
}
