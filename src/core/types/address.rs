//! Memory address wrapper type with hex parsing

use super::error::{MemoryError, MemoryResult};
use super::region::MemoryRegion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents an absolute virtual address in the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds a byte offset to the address
    pub const fn add(&self, offset: usize) -> Self {
        Address(self.0.wrapping_add(offset))
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Parses hexadecimal text with or without a `0x` prefix, as addresses
    /// are always displayed in hex
    pub fn from_hex(s: &str) -> MemoryResult<Self> {
        let s = s.trim();
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MemoryError::invalid_argument(format!("invalid address '{}'", s)));
        }
        usize::from_str_radix(digits, 16)
            .map(Address::new)
            .map_err(|_| MemoryError::invalid_argument(format!("invalid address '{}'", s)))
    }
}

impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::from_hex(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

/// An address together with the region it was found in.
///
/// The region is a snapshot taken when the address was recorded; it is kept
/// for permission checks and display and may be stale by the time it is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryAddress {
    pub address: Address,
    pub region: MemoryRegion,
}

impl MemoryAddress {
    pub fn new(address: Address, region: MemoryRegion) -> Self {
        MemoryAddress { address, region }
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x} (in {})", self.address, self.region.path)
    }
}
