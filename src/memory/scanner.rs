//! Occurrence search over memory regions or previously found addresses

use crate::config::ScannerConfig;
use crate::core::types::{
    Address, ComparisonOp, MemoryAddress, MemoryRegion, MemoryResult, ProcessId, ValueType,
};
use crate::memory::access::MemoryAccess;
use crate::memory::compare::Comparator;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

/// Options for memory scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Scan regions on a worker pool instead of the calling thread
    pub parallel: bool,
    /// Size of the worker pool
    pub max_threads: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            max_threads: num_cpus::get().min(8),
        }
    }
}

impl ScanOptions {
    /// Single-threaded scanning
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            max_threads: 1,
        }
    }
}

impl From<&ScannerConfig> for ScanOptions {
    fn from(config: &ScannerConfig) -> Self {
        Self {
            parallel: config.parallel,
            max_threads: config.max_threads,
        }
    }
}

/// Something a scan can draw candidate addresses from
pub trait CandidateSource {
    /// Returns every candidate whose memory satisfies `comparator`, in source order
    fn collect_matches<M: MemoryAccess + ?Sized>(
        &self,
        scanner: &MemoryScanner,
        memory: &M,
        pid: ProcessId,
        comparator: &Comparator,
    ) -> Vec<MemoryAddress>;
}

/// Runs comparisons against process memory, optionally on a rayon pool
#[derive(Debug)]
pub struct MemoryScanner {
    options: ScanOptions,
    pool: Option<ThreadPool>,
}

impl Default for MemoryScanner {
    fn default() -> Self {
        Self::new(ScanOptions::default())
    }
}

impl MemoryScanner {
    pub fn new(options: ScanOptions) -> Self {
        let pool = if options.parallel && options.max_threads > 1 {
            match ThreadPoolBuilder::new()
                .num_threads(options.max_threads)
                .thread_name(|i| format!("procmem-scan-{}", i))
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!("Failed to build scan thread pool, scanning sequentially: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self { options, pool }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Finds every address in `source` whose value compares true against `needle`.
    ///
    /// Fails only when the (type, op, needle) triple itself is invalid;
    /// unreadable regions or addresses are skipped.
    pub fn find_occurrences<M, S>(
        &self,
        memory: &M,
        pid: ProcessId,
        source: &S,
        value_type: ValueType,
        needle: &[u8],
        op: ComparisonOp,
    ) -> MemoryResult<Vec<MemoryAddress>>
    where
        M: MemoryAccess + ?Sized,
        S: CandidateSource + ?Sized,
    {
        let comparator = Comparator::new(value_type, op, needle)?;
        Ok(source.collect_matches(self, memory, pid, &comparator))
    }
}

impl CandidateSource for [MemoryRegion] {
    fn collect_matches<M: MemoryAccess + ?Sized>(
        &self,
        scanner: &MemoryScanner,
        memory: &M,
        pid: ProcessId,
        comparator: &Comparator,
    ) -> Vec<MemoryAddress> {
        let readable = |region: &&MemoryRegion| region.permissions.readable;

        match &scanner.pool {
            // Indexed collect keeps region order
            Some(pool) => pool.install(|| {
                self.par_iter()
                    .filter(readable)
                    .map(|region| scan_region(memory, pid, region, comparator))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .flatten()
                    .collect()
            }),
            None => self
                .iter()
                .filter(readable)
                .flat_map(|region| scan_region(memory, pid, region, comparator))
                .collect(),
        }
    }
}

impl CandidateSource for [MemoryAddress] {
    fn collect_matches<M: MemoryAccess + ?Sized>(
        &self,
        _scanner: &MemoryScanner,
        memory: &M,
        pid: ProcessId,
        comparator: &Comparator,
    ) -> Vec<MemoryAddress> {
        let width = comparator.width();

        self.iter()
            .filter(|candidate| candidate.region.permissions.readable)
            .filter(|candidate| match memory.read_memory(pid, candidate.address, width) {
                Ok(bytes) => comparator.matches(&bytes),
                Err(e) => {
                    debug!(address = %candidate.address, "skipping unreadable candidate: {}", e);
                    false
                }
            })
            .cloned()
            .collect()
    }
}

/// Reads a whole region once and slides a one-byte-step window over it
fn scan_region<M: MemoryAccess + ?Sized>(
    memory: &M,
    pid: ProcessId,
    region: &MemoryRegion,
    comparator: &Comparator,
) -> Vec<MemoryAddress> {
    let bytes = match memory.read_memory(pid, region.start, region.len()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(start = %region.start, path = %region.path, "skipping region: {}", e);
            return Vec::new();
        }
    };

    if bytes.len() < comparator.width() {
        return Vec::new();
    }

    bytes
        .windows(comparator.width())
        .enumerate()
        .filter(|(_, window)| comparator.matches(window))
        .map(|(offset, _)| MemoryAddress::new(region.start.add(offset), region.clone()))
        .collect()
}

/// One-shot search with default options
pub fn find_occurrences<M, S>(
    memory: &M,
    pid: ProcessId,
    source: &S,
    value_type: ValueType,
    needle: &[u8],
    op: ComparisonOp,
) -> MemoryResult<Vec<MemoryAddress>>
where
    M: MemoryAccess + ?Sized,
    S: CandidateSource + ?Sized,
{
    MemoryScanner::new(ScanOptions::sequential()).find_occurrences(memory, pid, source, value_type, needle, op)
}

/// Addresses of a result set, for comparisons in tests and listings
pub fn addresses_of(found: &[MemoryAddress]) -> Vec<Address> {
    found.iter().map(|found| found.address).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MemoryError, RegionPermissions};
    use crate::linux::AccessFault;
    use crate::memory::mock::MockMemory;

    fn perms(field: &str) -> RegionPermissions {
        RegionPermissions::parse(field)
    }

    fn region(start: usize, len: usize, field: &str) -> MemoryRegion {
        MemoryRegion::new(start, start + len, perms(field), "[anon]")
    }

    fn int32(value: i32) -> Vec<u8> {
        value.to_ne_bytes().to_vec()
    }

    #[test]
    fn test_unaligned_matches_in_order() {
        let mut bytes = vec![0u8; 16];
        bytes[1..5].copy_from_slice(&int32(100));
        bytes[9..13].copy_from_slice(&int32(100));
        let memory = MockMemory::new().with_segment(0x1000, bytes);
        let regions = vec![region(0x1000, 16, "rw-p")];

        let found = find_occurrences(
            &memory,
            1,
            regions.as_slice(),
            ValueType::I32,
            &int32(100),
            ComparisonOp::Equal,
        )
        .unwrap();

        assert_eq!(
            addresses_of(&found),
            vec![Address::new(0x1001), Address::new(0x1009)]
        );
        assert_eq!(found[0].region, regions[0]);
    }

    #[test]
    fn test_unreadable_and_failing_regions_are_skipped() {
        let memory = MockMemory::new()
            .with_segment(0x1000, int32(7))
            .with_segment(0x2000, int32(7))
            .with_segment(0x3000, int32(7));
        memory.fail_reads_at(Address::new(0x2000), AccessFault::AccessDenied);
        let regions = vec![
            region(0x1000, 4, "---p"),
            region(0x2000, 4, "r--p"),
            region(0x3000, 4, "r--p"),
        ];

        let found = find_occurrences(
            &memory,
            1,
            regions.as_slice(),
            ValueType::I32,
            &int32(7),
            ComparisonOp::Equal,
        )
        .unwrap();

        assert_eq!(addresses_of(&found), vec![Address::new(0x3000)]);
    }

    #[test]
    fn test_partial_region_read_scans_what_was_read() {
        // Region claims 16 bytes but only 8 are backed
        let mut bytes = vec![0u8; 8];
        bytes[4..8].copy_from_slice(&int32(-5));
        let memory = MockMemory::new().with_segment(0x1000, bytes);
        let regions = vec![region(0x1000, 16, "r--p")];

        let found = find_occurrences(
            &memory,
            1,
            regions.as_slice(),
            ValueType::I32,
            &int32(-5),
            ComparisonOp::Equal,
        )
        .unwrap();

        assert_eq!(addresses_of(&found), vec![Address::new(0x1004)]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let memory = MockMemory::new();
        let mut regions = Vec::new();
        for i in 0..16usize {
            let base = 0x10000 * (i + 1);
            let bytes: Vec<u8> = (0..256u32).map(|b| ((b as usize + i) % 7) as u8).collect();
            memory.add_segment(base, bytes);
            regions.push(region(base, 256, "rw-p"));
        }

        let needle = [3u8];
        let sequential = MemoryScanner::new(ScanOptions::sequential())
            .find_occurrences(&memory, 1, regions.as_slice(), ValueType::U8, &needle, ComparisonOp::Greater)
            .unwrap();
        let parallel_scanner = MemoryScanner::new(ScanOptions {
            parallel: true,
            max_threads: 4,
        });
        assert!(parallel_scanner.is_parallel());
        let parallel = parallel_scanner
            .find_occurrences(&memory, 1, regions.as_slice(), ValueType::U8, &needle, ComparisonOp::Greater)
            .unwrap();

        assert!(!sequential.is_empty());
        assert_eq!(addresses_of(&sequential), addresses_of(&parallel));
    }

    #[test]
    fn test_rescan_skips_vanished_addresses() {
        let memory = MockMemory::new()
            .with_segment(0x1000, int32(1))
            .with_segment(0x2000, int32(1));
        let candidates = vec![
            MemoryAddress::new(Address::new(0x1000), region(0x1000, 4, "rw-p")),
            MemoryAddress::new(Address::new(0x2000), region(0x2000, 4, "rw-p")),
        ];
        memory.remove_segment(0x1000);

        let found = find_occurrences(
            &memory,
            1,
            candidates.as_slice(),
            ValueType::I32,
            &int32(1),
            ComparisonOp::Equal,
        )
        .unwrap();

        assert_eq!(addresses_of(&found), vec![Address::new(0x2000)]);
    }

    #[test]
    fn test_text_rescan_uses_needle_length() {
        let memory = MockMemory::new().with_segment(0x1000, b"health=100".to_vec());
        let candidates = vec![MemoryAddress::new(
            Address::new(0x1000),
            region(0x1000, 10, "rw-p"),
        )];

        let found = find_occurrences(
            &memory,
            1,
            candidates.as_slice(),
            ValueType::String,
            b"health",
            ComparisonOp::Equal,
        )
        .unwrap();
        assert_eq!(found.len(), 1);

        let result = find_occurrences(
            &memory,
            1,
            candidates.as_slice(),
            ValueType::String,
            b"health",
            ComparisonOp::Less,
        );
        assert!(matches!(result, Err(MemoryError::InvalidArgument(_))));
    }
}
