//! Core module containing fundamental types for procmem
//!
//! This module provides the foundational building blocks used throughout
//! the crate, including address handling, memory values, region snapshots,
//! and error types.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, ComparisonOp, MemoryAddress, MemoryError, MemoryRegion, MemoryResult, MemoryValue,
    ProcessId, RegionPermissions, ValueType,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

// Platform verification at compile time
#[cfg(not(target_os = "linux"))]
compile_error!("procmem only supports Linux (process_vm_readv/process_vm_writev)");
