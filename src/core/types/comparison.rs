//! Comparison operators used by scans

use super::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison applied between the value in memory (left) and the needle (right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
}

impl ComparisonOp {
    pub const ALL: [ComparisonOp; 6] = [
        ComparisonOp::Equal,
        ComparisonOp::NotEqual,
        ComparisonOp::Greater,
        ComparisonOp::Less,
        ComparisonOp::GreaterEqual,
        ComparisonOp::LessEqual,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Equal => "==",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::Greater => ">",
            ComparisonOp::Less => "<",
            ComparisonOp::GreaterEqual => ">=",
            ComparisonOp::LessEqual => "<=",
        }
    }

    /// Applies the operator to two ordered values
    pub fn evaluate<T: PartialOrd>(&self, lhs: T, rhs: T) -> bool {
        match self {
            ComparisonOp::Equal => lhs == rhs,
            ComparisonOp::NotEqual => lhs != rhs,
            ComparisonOp::Greater => lhs > rhs,
            ComparisonOp::Less => lhs < rhs,
            ComparisonOp::GreaterEqual => lhs >= rhs,
            ComparisonOp::LessEqual => lhs <= rhs,
        }
    }
}

impl FromStr for ComparisonOp {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComparisonOp::ALL
            .iter()
            .copied()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| MemoryError::invalid_argument(format!("invalid scan type '{}'", s)))
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
