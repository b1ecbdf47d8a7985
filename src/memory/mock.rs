//! Mock memory backend for testing
//!
//! Provides a configurable implementation of [`MemoryAccess`] that reads and
//! writes in-memory segments instead of a real process, with injectable
//! faults and short transfers.

use crate::core::types::{Address, MemoryResult, ProcessId};
use crate::linux::AccessFault;
use crate::memory::access::MemoryAccess;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    segments: BTreeMap<usize, Vec<u8>>,
    read_faults: HashMap<Address, AccessFault>,
    write_faults: HashMap<Address, AccessFault>,
    write_limits: HashMap<Address, usize>,
    write_counts: HashMap<Address, usize>,
    reads: usize,
}

impl MockState {
    /// Segment base and offset for an address inside a segment
    fn locate(&self, address: Address) -> Option<(usize, usize)> {
        let addr = address.as_usize();
        let (&base, data) = self.segments.range(..=addr).next_back()?;
        let offset = addr - base;
        (offset < data.len()).then_some((base, offset))
    }
}

/// In-memory stand-in for a target process
///
/// Reads that run past the end of a segment are truncated, which mimics a
/// partial transfer at the edge of a mapping.
#[derive(Debug, Default)]
pub struct MockMemory {
    state: Mutex<MockState>,
}

impl MockMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a segment of bytes starting at `base`
    pub fn with_segment(self, base: usize, data: Vec<u8>) -> Self {
        self.add_segment(base, data);
        self
    }

    pub fn add_segment(&self, base: usize, data: Vec<u8>) {
        self.lock().segments.insert(base, data);
    }

    /// Removes the segment starting at `base`, as if it had been unmapped
    pub fn remove_segment(&self, base: usize) {
        self.lock().segments.remove(&base);
    }

    /// Overwrites bytes as the target process itself would (not counted as a write)
    pub fn set_bytes(&self, address: Address, bytes: &[u8]) {
        let mut state = self.lock();
        if let Some((base, offset)) = state.locate(address) {
            if let Some(segment) = state.segments.get_mut(&base) {
                let end = (offset + bytes.len()).min(segment.len());
                segment[offset..end].copy_from_slice(&bytes[..end - offset]);
            }
        }
    }

    /// Current bytes at `address`, if fully inside one segment
    pub fn bytes_at(&self, address: Address, length: usize) -> Option<Vec<u8>> {
        let state = self.lock();
        let (base, offset) = state.locate(address)?;
        state.segments[&base]
            .get(offset..offset + length)
            .map(|bytes| bytes.to_vec())
    }

    /// Makes every read starting exactly at `address` fail
    pub fn fail_reads_at(&self, address: Address, fault: AccessFault) {
        self.lock().read_faults.insert(address, fault);
    }

    /// Makes every write starting exactly at `address` fail
    pub fn fail_writes_at(&self, address: Address, fault: AccessFault) {
        self.lock().write_faults.insert(address, fault);
    }

    /// Caps writes at `address` to `max_bytes`, producing short writes
    pub fn limit_writes_at(&self, address: Address, max_bytes: usize) {
        self.lock().write_limits.insert(address, max_bytes);
    }

    pub fn clear_faults(&self) {
        let mut state = self.lock();
        state.read_faults.clear();
        state.write_faults.clear();
        state.write_limits.clear();
    }

    /// Number of write calls that reached `address`, including failed ones
    pub fn write_count(&self, address: Address) -> usize {
        self.lock().write_counts.get(&address).copied().unwrap_or(0)
    }

    /// Total number of read calls served
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not cascade into every other assertion
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MemoryAccess for MockMemory {
    fn read_memory(&self, pid: ProcessId, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        let mut state = self.lock();
        state.reads += 1;

        if let Some(fault) = state.read_faults.get(&address) {
            return Err(fault.into_error(pid, address));
        }
        if length == 0 {
            return Ok(Vec::new());
        }

        let (base, offset) = state
            .locate(address)
            .ok_or_else(|| AccessFault::InvalidAddress.into_error(pid, address))?;
        let segment = &state.segments[&base];
        let end = offset.saturating_add(length).min(segment.len());

        Ok(segment[offset..end].to_vec())
    }

    fn write_memory(&self, pid: ProcessId, address: Address, data: &[u8]) -> MemoryResult<usize> {
        let mut state = self.lock();
        *state.write_counts.entry(address).or_insert(0) += 1;

        if let Some(fault) = state.write_faults.get(&address) {
            return Err(fault.into_error(pid, address));
        }
        if data.is_empty() {
            return Ok(0);
        }

        let (base, offset) = state
            .locate(address)
            .ok_or_else(|| AccessFault::InvalidAddress.into_error(pid, address))?;
        let limit = state.write_limits.get(&address).copied().unwrap_or(usize::MAX);

        let segment = state
            .segments
            .get_mut(&base)
            .ok_or_else(|| AccessFault::InvalidAddress.into_error(pid, address))?;
        let written = data.len().min(segment.len() - offset).min(limit);
        segment[offset..offset + written].copy_from_slice(&data[..written]);

        Ok(written)
    }
}
