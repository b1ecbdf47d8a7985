//! Memory operations: cross-process access, typed comparison, scanning and freezing
//!
//! - [`access`]: the [`MemoryAccess`] seam and its `process_vm_*` backend
//! - [`compare`]: typed comparison of raw bytes
//! - [`scanner`]: occurrence search over regions or earlier results
//! - [`region_scanner`]: the scan-narrowing state machine
//! - [`freezer`]: continuous rewriting of chosen addresses
//! - [`regions`]: `/proc/<pid>/maps` parsing

pub mod access;
pub mod compare;
pub mod freezer;
pub mod mock;
pub mod region_scanner;
pub mod regions;
pub mod scanner;

pub use access::{MemoryAccess, ProcessMemory};
pub use compare::{compare, Comparator};
pub use freezer::{AddressFreezer, FreezerSnapshot, FrozenAddress};
pub use mock::MockMemory;
pub use region_scanner::RegionScanner;
pub use regions::{enumerate_regions, find_region};
pub use scanner::{addresses_of, find_occurrences, CandidateSource, MemoryScanner, ScanOptions};
