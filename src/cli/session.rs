//! State shared by all shell commands

use crate::config::Config;
use crate::core::types::{
    Address, ComparisonOp, MemoryError, MemoryRegion, MemoryResult, ProcessId, ValueType,
};
use crate::memory::access::{MemoryAccess, ProcessMemory};
use crate::memory::freezer::AddressFreezer;
use crate::memory::region_scanner::RegionScanner;
use crate::memory::scanner::ScanOptions;
use crate::process::{AttachedProcess, RegionProvider};
use std::sync::Arc;

/// The attached process together with its scanner and freezer
pub struct Session<M: MemoryAccess + 'static = ProcessMemory> {
    memory: Arc<M>,
    process: Option<Box<dyn RegionProvider>>,
    scanner: RegionScanner<M>,
    freezer: AddressFreezer<M>,
    config: Config,
}

impl<M: MemoryAccess + 'static> Session<M> {
    pub fn new(memory: Arc<M>, config: Config) -> Self {
        Self {
            scanner: RegionScanner::new(Arc::clone(&memory), ScanOptions::from(&config.scanner)),
            freezer: AddressFreezer::with_config(Arc::clone(&memory), &config.freezer),
            memory,
            process: None,
            config,
        }
    }

    /// Attaches to a live process by pid
    pub fn attach(&mut self, pid: ProcessId) -> MemoryResult<()> {
        let process = AttachedProcess::attach(pid)?;
        self.attach_provider(Box::new(process));
        Ok(())
    }

    /// Attaches to any region source. Switching to a different pid resets
    /// the scanner and the freezer.
    pub fn attach_provider(&mut self, provider: Box<dyn RegionProvider>) {
        let pid = provider.pid();
        if self.pid() != Some(pid) {
            self.scanner.set_pid(pid);
            self.freezer.set_pid(pid);
        }
        self.process = Some(provider);
    }

    pub fn pid(&self) -> Option<ProcessId> {
        self.process.as_ref().map(|process| process.pid())
    }

    /// Pid of the attached process, or `InvalidState` when detached
    pub fn require_pid(&self) -> MemoryResult<ProcessId> {
        self.pid()
            .ok_or_else(|| MemoryError::invalid_state("not attached to any process"))
    }

    /// Fresh region list of the attached process
    pub fn regions(&self) -> MemoryResult<Vec<MemoryRegion>> {
        match &self.process {
            Some(process) => process.regions(),
            None => Err(MemoryError::invalid_state("not attached to any process")),
        }
    }

    pub fn read(&self, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        let pid = self.require_pid()?;
        self.memory.read_memory(pid, address, length)
    }

    pub fn write(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        let pid = self.require_pid()?;
        self.memory.write_memory(pid, address, data)
    }

    /// One scan step. The memory map is only read when starting a new scan.
    pub fn scan(&mut self, value_type: ValueType, needle: &[u8], op: ComparisonOp) -> MemoryResult<usize> {
        let process = &self.process;
        self.scanner.scan(
            || match process {
                Some(process) => process.regions(),
                None => Err(MemoryError::invalid_state("not attached to any process")),
            },
            value_type,
            needle,
            op,
        )
    }

    pub fn scanner(&self) -> &RegionScanner<M> {
        &self.scanner
    }

    pub fn scanner_mut(&mut self) -> &mut RegionScanner<M> {
        &mut self.scanner
    }

    pub fn freezer(&self) -> &AddressFreezer<M> {
        &self.freezer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Diagnostics queued by the freezer worker since the last call
    pub fn drain_messages(&self) -> Vec<String> {
        self.freezer.drain_messages()
    }
}
