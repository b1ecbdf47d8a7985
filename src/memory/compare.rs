//! Typed comparison of raw memory against a needle
//!
//! Every fixed-width type goes through one generic ordering routine selected
//! at run time by [`ValueType`]; text has its own equality-only path.
//! `Equal` and `NotEqual` are decided on the raw bytes for every type, so two
//! floats compare equal exactly when their bit patterns do (`-0.0 != 0.0`,
//! and a NaN equals the identical NaN).

use crate::core::types::{ComparisonOp, MemoryError, MemoryResult, ValueType};

/// A prepared (type, operator, needle) triple applied to many windows
#[derive(Debug, Clone, PartialEq)]
pub struct Comparator {
    value_type: ValueType,
    op: ComparisonOp,
    needle: Vec<u8>,
}

impl Comparator {
    /// Validates the triple once so the per-window check cannot fail.
    ///
    /// Numeric needles must hold at least one value of the type (extra bytes
    /// are ignored); text needles must be non-empty and text only supports
    /// `Equal`.
    pub fn new(value_type: ValueType, op: ComparisonOp, needle: &[u8]) -> MemoryResult<Self> {
        let needle = match value_type.size() {
            Some(width) => {
                if needle.len() < width {
                    return Err(MemoryError::invalid_argument(format!(
                        "{} needle needs {} bytes, got {}",
                        value_type,
                        width,
                        needle.len()
                    )));
                }
                needle[..width].to_vec()
            }
            None => {
                if op != ComparisonOp::Equal {
                    return Err(MemoryError::invalid_argument(format!(
                        "operator {} is not supported for strings",
                        op
                    )));
                }
                if needle.is_empty() {
                    return Err(MemoryError::invalid_argument("empty string needle"));
                }
                needle.to_vec()
            }
        };

        Ok(Self {
            value_type,
            op,
            needle,
        })
    }

    /// Number of bytes each window must provide
    pub fn width(&self) -> usize {
        self.needle.len()
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn needle(&self) -> &[u8] {
        &self.needle
    }

    /// Tests the front of `window` against the needle; short windows never match
    pub fn matches(&self, window: &[u8]) -> bool {
        let Some(lhs) = window.get(..self.width()) else {
            return false;
        };
        let rhs = self.needle.as_slice();

        match self.op {
            ComparisonOp::Equal => lhs == rhs,
            ComparisonOp::NotEqual => lhs != rhs,
            op => match self.value_type {
                ValueType::I8 => ordered(op, lhs, rhs, i8::from_ne_bytes),
                ValueType::I16 => ordered(op, lhs, rhs, i16::from_ne_bytes),
                ValueType::I32 => ordered(op, lhs, rhs, i32::from_ne_bytes),
                ValueType::I64 => ordered(op, lhs, rhs, i64::from_ne_bytes),
                ValueType::U8 => ordered(op, lhs, rhs, u8::from_ne_bytes),
                ValueType::U16 => ordered(op, lhs, rhs, u16::from_ne_bytes),
                ValueType::U32 => ordered(op, lhs, rhs, u32::from_ne_bytes),
                ValueType::U64 => ordered(op, lhs, rhs, u64::from_ne_bytes),
                ValueType::F32 => ordered(op, lhs, rhs, f32::from_ne_bytes),
                ValueType::F64 => ordered(op, lhs, rhs, f64::from_ne_bytes),
                // rejected in new()
                ValueType::String => false,
            },
        }
    }
}

fn ordered<T, const N: usize>(
    op: ComparisonOp,
    lhs: &[u8],
    rhs: &[u8],
    decode: fn([u8; N]) -> T,
) -> bool
where
    T: PartialOrd,
{
    let (Ok(lhs), Ok(rhs)) = (<[u8; N]>::try_from(lhs), <[u8; N]>::try_from(rhs)) else {
        return false;
    };
    op.evaluate(decode(lhs), decode(rhs))
}

/// Compares `lhs` (memory) against `rhs` (needle) as `value_type` under `op`.
///
/// Fails with `InvalidArgument` for a non-`Equal` operator on text or when
/// either buffer is shorter than the type width (text: the needle length).
pub fn compare(lhs: &[u8], rhs: &[u8], value_type: ValueType, op: ComparisonOp) -> MemoryResult<bool> {
    let comparator = Comparator::new(value_type, op, rhs)?;
    if lhs.len() < comparator.width() {
        return Err(MemoryError::invalid_argument(format!(
            "{} comparison needs {} bytes, got {}",
            value_type,
            comparator.width(),
            lhs.len()
        )));
    }
    Ok(comparator.matches(lhs))
}
