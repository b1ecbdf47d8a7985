//! Memory region discovery for Linux processes
//!
//! Regions come from the live `/proc/<pid>/maps` file and are returned as
//! immutable [`MemoryRegion`](crate::core::types::MemoryRegion) snapshots.

pub mod enumerator;

pub use enumerator::{enumerate_regions, find_region, parse_maps, parse_maps_line};
