//! Core type definitions for procmem
//!
//! This module contains all fundamental types used throughout the crate,
//! including addresses, region snapshots, typed values, and error types.

mod address;
mod comparison;
mod error;
mod region;
mod value;

// Re-export all public types
pub use address::{Address, MemoryAddress};
pub use comparison::ComparisonOp;
pub use error::{MemoryError, MemoryResult};
pub use region::{MemoryRegion, RegionPermissions, UNKNOWN_PATH};
pub use value::{MemoryValue, ValueType};

// Common type aliases
pub type ProcessId = i32;
