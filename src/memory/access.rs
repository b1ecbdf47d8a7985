//! Cross-process memory access
//!
//! [`MemoryAccess`] is the seam between the scan/freeze engines and the OS.
//! Production code uses [`ProcessMemory`]; tests use
//! [`MockMemory`](crate::memory::mock::MockMemory).

use crate::core::types::{Address, MemoryResult, ProcessId};
use crate::linux;
use tracing::debug;

/// Bulk read/write of another process's memory.
///
/// A transfer shorter than requested is not an error: reads return only the
/// bytes obtained and writes return the count actually written, and the
/// caller decides whether the short result matters.
pub trait MemoryAccess: Send + Sync {
    /// Reads up to `length` bytes at `address`
    fn read_memory(&self, pid: ProcessId, address: Address, length: usize) -> MemoryResult<Vec<u8>>;

    /// Writes `data` at `address`, returning the number of bytes written
    fn write_memory(&self, pid: ProcessId, address: Address, data: &[u8]) -> MemoryResult<usize>;
}

/// [`MemoryAccess`] backed by `process_vm_readv` / `process_vm_writev`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessMemory;

impl ProcessMemory {
    pub fn new() -> Self {
        ProcessMemory
    }
}

impl MemoryAccess for ProcessMemory {
    fn read_memory(&self, pid: ProcessId, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        if length == 0 {
            return Ok(Vec::new());
        }

        let mut buffer = vec![0u8; length];
        let read = linux::process_vm_read(pid, address, &mut buffer)
            .map_err(|fault| fault.into_error(pid, address))?;

        if read != length {
            debug!(pid, %address, read, length, "partial read");
            buffer.truncate(read);
        }

        Ok(buffer)
    }

    fn write_memory(&self, pid: ProcessId, address: Address, data: &[u8]) -> MemoryResult<usize> {
        if data.is_empty() {
            return Ok(0);
        }

        let written = linux::process_vm_write(pid, address, data)
            .map_err(|fault| fault.into_error(pid, address))?;

        if written != data.len() {
            debug!(pid, %address, written, length = data.len(), "partial write");
        }

        Ok(written)
    }
}

impl<M: MemoryAccess + ?Sized> MemoryAccess for std::sync::Arc<M> {
    fn read_memory(&self, pid: ProcessId, address: Address, length: usize) -> MemoryResult<Vec<u8>> {
        (**self).read_memory(pid, address, length)
    }

    fn write_memory(&self, pid: ProcessId, address: Address, data: &[u8]) -> MemoryResult<usize> {
        (**self).write_memory(pid, address, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MemoryError;

    fn own_pid() -> ProcessId {
        std::process::id() as ProcessId
    }

    #[test]
    fn test_read_own_buffer() {
        let data = vec![0xAAu8, 0xBB, 0xCC, 0xDD];
        let memory = ProcessMemory::new();

        let bytes = memory
            .read_memory(own_pid(), Address::new(data.as_ptr() as usize), data.len())
            .unwrap();

        assert_eq!(bytes, data);
    }

    #[test]
    fn test_zero_length_transfers() {
        let memory = ProcessMemory::new();
        assert!(memory
            .read_memory(own_pid(), Address::null(), 0)
            .unwrap()
            .is_empty());
        assert_eq!(memory.write_memory(own_pid(), Address::null(), &[]).unwrap(), 0);
    }

    #[test]
    fn test_invalid_address_maps_to_error() {
        let memory = ProcessMemory::new();
        let result = memory.read_memory(own_pid(), Address::new(0x10), 8);
        assert!(matches!(result, Err(MemoryError::InvalidAddress(_))));

        let result = memory.write_memory(own_pid(), Address::new(0x10), &[1, 2]);
        assert!(matches!(result, Err(MemoryError::InvalidAddress(_))));
    }

    #[test]
    fn test_missing_process_maps_to_process_gone() {
        let memory = ProcessMemory::new();
        let result = memory.read_memory(i32::MAX, Address::new(0x1000), 4);
        assert!(matches!(result, Err(MemoryError::ProcessGone(_))));
    }
}
