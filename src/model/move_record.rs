use std::fmt::Display;

use super::Operator;

/// One completed move. The rendered text is for display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRecord {
    pub left: i64,
    pub operator: Operator,
    pub right: i64,
    pub result: i64,
}

impl MoveRecord {
    pub fn new(left: i64, operator: Operator, right: i64, result: i64) -> Self {
        Self {
            left,
            operator,
            right,
            result,
        }
    }
}

impl Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} = {}",
            self.left, self.operator, self.right, self.result
        )
    }
}
