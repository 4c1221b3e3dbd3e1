use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an operation was refused. The board recovers from all of these locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0} is not evenly divisible by {1}")]
    NotAnInteger(i64, i64),
    #[error("result does not fit in a 64-bit integer")]
    Overflow,
    #[error("no operand and operator selected")]
    MissingOperand,
    #[error("slot {0} cannot be used as the second operand")]
    InvalidSlot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn all() -> [Operator; 4] {
        [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
        ]
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        match symbol {
            "+" => Some(Operator::Add),
            "-" => Some(Operator::Subtract),
            "×" | "*" | "x" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Only integer results are accepted; anything else is an error rather than a rounded value.
    pub fn apply(&self, a: i64, b: i64) -> Result<i64, MoveError> {
        match self {
            Operator::Add => a.checked_add(b).ok_or(MoveError::Overflow),
            Operator::Subtract => a.checked_sub(b).ok_or(MoveError::Overflow),
            Operator::Multiply => a.checked_mul(b).ok_or(MoveError::Overflow),
            Operator::Divide => {
                if b == 0 {
                    return Err(MoveError::DivisionByZero);
                }
                match a.checked_rem(b) {
                    Some(0) => a.checked_div(b).ok_or(MoveError::Overflow),
                    Some(_) => Err(MoveError::NotAnInteger(a, b)),
                    None => Err(MoveError::Overflow),
                }
            }
        }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
