//! Progressive narrowing of candidate addresses
//!
//! The first scan walks every readable region of the target; each later scan
//! re-reads only the addresses that survived the previous one, so the set can
//! shrink but never grow.

use crate::core::types::{
    ComparisonOp, MemoryAddress, MemoryError, MemoryRegion, MemoryResult, ProcessId, ValueType,
};
use crate::memory::access::MemoryAccess;
use crate::memory::scanner::{MemoryScanner, ScanOptions};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
struct ScanState {
    current: Vec<MemoryAddress>,
    previous: Vec<MemoryAddress>,
    started: bool,
    undone: bool,
    value_type: Option<ValueType>,
}

/// Scan-narrowing state machine for one attached process
#[derive(Debug)]
pub struct RegionScanner<M: MemoryAccess> {
    memory: Arc<M>,
    engine: MemoryScanner,
    pid: Option<ProcessId>,
    state: ScanState,
}

impl<M: MemoryAccess> RegionScanner<M> {
    pub fn new(memory: Arc<M>, options: ScanOptions) -> Self {
        Self {
            memory,
            engine: MemoryScanner::new(options),
            pid: None,
            state: ScanState::default(),
        }
    }

    /// Switches to another process; all recorded addresses are discarded
    pub fn set_pid(&mut self, pid: ProcessId) {
        self.pid = Some(pid);
        self.clear();
    }

    pub fn pid(&self) -> Option<ProcessId> {
        self.pid
    }

    /// First scan over the full region list. Only legal while idle.
    ///
    /// Returns the number of matching addresses.
    pub fn new_scan(
        &mut self,
        regions: &[MemoryRegion],
        value_type: ValueType,
        needle: &[u8],
        op: ComparisonOp,
    ) -> MemoryResult<usize> {
        if self.state.started {
            return Err(MemoryError::invalid_state(
                "a scan is already in progress, clear it before starting a new one",
            ));
        }
        let pid = self.attached_pid()?;

        let found = self
            .engine
            .find_occurrences(self.memory.as_ref(), pid, regions, value_type, needle, op)?;
        info!(pid, regions = regions.len(), matches = found.len(), "new scan {} {}", op, value_type);

        self.state.current = found;
        self.state.started = true;
        self.state.undone = false;
        self.state.value_type = Some(value_type);
        Ok(self.state.current.len())
    }

    /// Re-checks only the current set. Only legal after a new scan.
    pub fn next_scan(&mut self, value_type: ValueType, needle: &[u8], op: ComparisonOp) -> MemoryResult<usize> {
        if !self.state.started {
            return Err(MemoryError::invalid_state("no scan in progress"));
        }
        let pid = self.attached_pid()?;

        let found = self.engine.find_occurrences(
            self.memory.as_ref(),
            pid,
            self.state.current.as_slice(),
            value_type,
            needle,
            op,
        )?;
        info!(
            pid,
            before = self.state.current.len(),
            after = found.len(),
            "next scan {} {}",
            op,
            value_type
        );

        self.state.previous = std::mem::replace(&mut self.state.current, found);
        self.state.undone = false;
        self.state.value_type = Some(value_type);
        Ok(self.state.current.len())
    }

    /// New scan when idle, next scan otherwise.
    ///
    /// `regions` is only consulted for a new scan, so the live memory map is
    /// not re-read while narrowing.
    pub fn scan<F>(
        &mut self,
        regions: F,
        value_type: ValueType,
        needle: &[u8],
        op: ComparisonOp,
    ) -> MemoryResult<usize>
    where
        F: FnOnce() -> MemoryResult<Vec<MemoryRegion>>,
    {
        if self.state.started {
            self.next_scan(value_type, needle, op)
        } else {
            let regions = regions()?;
            self.new_scan(&regions, value_type, needle, op)
        }
    }

    /// Restores the set from before the last scan step (one step deep)
    pub fn undo(&mut self) -> MemoryResult<()> {
        if self.state.previous.is_empty() {
            return Err(MemoryError::invalid_state("nothing to undo"));
        }
        if self.state.undone {
            return Err(MemoryError::invalid_state("undo has already been used for this scan"));
        }

        self.state.current = self.state.previous.clone();
        self.state.undone = true;
        Ok(())
    }

    /// Discards both sets and returns to idle
    pub fn clear(&mut self) {
        self.state = ScanState::default();
    }

    pub fn current(&self) -> &[MemoryAddress] {
        &self.state.current
    }

    pub fn previous(&self) -> &[MemoryAddress] {
        &self.state.previous
    }

    /// True between a new scan and the next clear
    pub fn is_active(&self) -> bool {
        self.state.started
    }

    /// Value type of the last completed scan step
    pub fn last_value_type(&self) -> Option<ValueType> {
        self.state.value_type
    }

    /// The search engine, for one-shot searches that must not touch scan state
    pub fn engine(&self) -> &MemoryScanner {
        &self.engine
    }

    pub fn memory(&self) -> &Arc<M> {
        &self.memory
    }

    fn attached_pid(&self) -> MemoryResult<ProcessId> {
        self.pid
            .ok_or_else(|| MemoryError::invalid_state("no process attached"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Address, RegionPermissions};
    use crate::memory::mock::MockMemory;
    use crate::memory::scanner::addresses_of;
    use pretty_assertions::assert_eq;

    fn setup() -> (Arc<MockMemory>, RegionScanner<MockMemory>, Vec<MemoryRegion>) {
        let mut bytes = vec![0u8; 32];
        bytes[4..8].copy_from_slice(&10i32.to_ne_bytes());
        bytes[20..24].copy_from_slice(&10i32.to_ne_bytes());
        let memory = Arc::new(MockMemory::new().with_segment(0x4000, bytes));
        let regions = vec![MemoryRegion::new(
            0x4000,
            0x4020,
            RegionPermissions::parse("rw-p"),
            "[heap]",
        )];

        let mut scanner = RegionScanner::new(Arc::clone(&memory), ScanOptions::sequential());
        scanner.set_pid(42);
        (memory, scanner, regions)
    }

    #[test]
    fn test_state_transitions() {
        let (memory, mut scanner, regions) = setup();
        assert!(!scanner.is_active());
        assert!(matches!(
            scanner.next_scan(ValueType::I32, &10i32.to_ne_bytes(), ComparisonOp::Equal),
            Err(MemoryError::InvalidState(_))
        ));

        let count = scanner
            .new_scan(&regions, ValueType::I32, &10i32.to_ne_bytes(), ComparisonOp::Equal)
            .unwrap();
        assert_eq!(count, 2);
        assert!(scanner.is_active());
        assert_eq!(scanner.last_value_type(), Some(ValueType::I32));
        assert!(matches!(
            scanner.new_scan(&regions, ValueType::I32, &10i32.to_ne_bytes(), ComparisonOp::Equal),
            Err(MemoryError::InvalidState(_))
        ));
        assert!(matches!(scanner.undo(), Err(MemoryError::InvalidState(_))));

        memory.set_bytes(Address::new(0x4014), &11i32.to_ne_bytes());
        let count = scanner
            .next_scan(ValueType::I32, &11i32.to_ne_bytes(), ComparisonOp::Equal)
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(addresses_of(scanner.current()), vec![Address::new(0x4014)]);
        assert_eq!(scanner.previous().len(), 2);

        scanner.undo().unwrap();
        assert_eq!(scanner.current().len(), 2);
        assert!(matches!(scanner.undo(), Err(MemoryError::InvalidState(_))));

        scanner.clear();
        assert!(!scanner.is_active());
        assert!(scanner.current().is_empty() && scanner.previous().is_empty());
    }

    #[test]
    fn test_scan_fetches_regions_only_when_idle() {
        let (_memory, mut scanner, regions) = setup();
        let needle = 10i32.to_ne_bytes();

        scanner
            .scan(|| Ok(regions.clone()), ValueType::I32, &needle, ComparisonOp::Equal)
            .unwrap();
        let count = scanner
            .scan(
                || panic!("regions must not be re-read while narrowing"),
                ValueType::I32,
                &needle,
                ComparisonOp::Equal,
            )
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_set_pid_resets_state() {
        let (_memory, mut scanner, regions) = setup();
        scanner
            .new_scan(&regions, ValueType::I32, &10i32.to_ne_bytes(), ComparisonOp::Equal)
            .unwrap();

        scanner.set_pid(43);
        assert_eq!(scanner.pid(), Some(43));
        assert!(!scanner.is_active());
        assert!(scanner.current().is_empty());
        assert_eq!(scanner.last_value_type(), None);
    }

    #[test]
    fn test_failed_step_keeps_state() {
        let (_memory, mut scanner, regions) = setup();
        scanner
            .new_scan(&regions, ValueType::I32, &10i32.to_ne_bytes(), ComparisonOp::Equal)
            .unwrap();

        let result = scanner.next_scan(ValueType::String, b"abc", ComparisonOp::Greater);
        assert!(matches!(result, Err(MemoryError::InvalidArgument(_))));
        assert_eq!(scanner.current().len(), 2);
        assert!(scanner.previous().is_empty());
    }

    #[test]
    fn test_requires_attached_process() {
        let memory = Arc::new(MockMemory::new());
        let mut scanner = RegionScanner::new(memory, ScanOptions::sequential());
        let result = scanner.new_scan(&[], ValueType::U8, &[1], ComparisonOp::Equal);
        assert!(matches!(result, Err(MemoryError::InvalidState(_))));
    }
}
