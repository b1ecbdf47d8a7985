//! The process the shell is working on

use crate::core::types::{MemoryError, MemoryRegion, MemoryResult, ProcessId};
use crate::memory::regions::enumerate_regions;
use crate::process::info::ProcessInfo;
use tracing::info;

/// Supplies the target pid and a fresh region list on demand
pub trait RegionProvider {
    fn pid(&self) -> ProcessId;

    /// Re-reads the live memory map; never cached
    fn regions(&self) -> MemoryResult<Vec<MemoryRegion>>;
}

/// A process selected by pid.
///
/// Attaching only validates the pid; no handle is held, so the process may
/// exit at any time and later operations report `ProcessGone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachedProcess {
    pid: ProcessId,
}

impl AttachedProcess {
    /// Rejects non-positive pids and the pid of this process
    pub fn attach(pid: ProcessId) -> MemoryResult<Self> {
        validate_pid(pid)?;
        info!(pid, "attached");
        Ok(Self { pid })
    }

    /// Name and command line of the target
    pub fn info(&self) -> MemoryResult<ProcessInfo> {
        ProcessInfo::query(self.pid)
    }
}

impl RegionProvider for AttachedProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn regions(&self) -> MemoryResult<Vec<MemoryRegion>> {
        enumerate_regions(self.pid)
    }
}

/// A fixed pid and region list, for driving the shell against an in-memory target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticProcess {
    pub pid: ProcessId,
    pub regions: Vec<MemoryRegion>,
}

impl StaticProcess {
    pub fn new(pid: ProcessId, regions: Vec<MemoryRegion>) -> Self {
        Self { pid, regions }
    }
}

impl RegionProvider for StaticProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn regions(&self) -> MemoryResult<Vec<MemoryRegion>> {
        Ok(self.regions.clone())
    }
}

/// Checks that `pid` can be a target
pub fn validate_pid(pid: ProcessId) -> MemoryResult<()> {
    if pid <= 0 {
        return Err(MemoryError::invalid_argument(format!("invalid pid {}", pid)));
    }
    if pid == std::process::id() as ProcessId {
        return Err(MemoryError::invalid_argument(
            "cannot attach to the current process",
        ));
    }
    Ok(())
}
