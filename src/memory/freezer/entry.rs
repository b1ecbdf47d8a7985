//! A single frozen address

use crate::core::types::{Address, MemoryAddress, ValueType};
use serde::{Serialize, Serializer};
use std::fmt;

/// An (address, payload) pair kept under continuous rewrite
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrozenAddress {
    pub target: MemoryAddress,
    pub enabled: bool,
    pub value_type: ValueType,
    /// Value as the user typed it; display only
    pub value_text: String,
    /// Bytes actually written
    #[serde(serialize_with = "serialize_hex")]
    pub payload: Vec<u8>,
    pub note: String,
}

impl FrozenAddress {
    pub fn address(&self) -> Address {
        self.target.address
    }
}

impl fmt::Display for FrozenAddress {
    /// `[X] 0x00007f0e9c000010 (in [heap]) [int32: 100] note`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:x} (in {}) [{}: {}]",
            if self.enabled { 'X' } else { ' ' },
            self.target.address,
            self.target.region.path,
            self.value_type,
            self.value_text
        )?;
        if !self.note.is_empty() {
            write!(f, " {}", self.note)?;
        }
        Ok(())
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}
