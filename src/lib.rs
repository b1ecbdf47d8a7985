//! procmem: memory scanner and value freezer for Linux processes

pub mod cli;
pub mod config;
pub mod core;
pub mod linux;
pub mod memory;
pub mod process;

// Re-export main types from core module
pub use core::types::{
    Address, ComparisonOp, MemoryAddress, MemoryError, MemoryRegion, MemoryResult, MemoryValue,
    ProcessId, RegionPermissions, ValueType,
};

pub use memory::{AddressFreezer, MemoryAccess, MockMemory, ProcessMemory, RegionScanner};

pub use core::{AUTHORS, VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_module_accessible() {
        assert_eq!(core::VERSION, env!("CARGO_PKG_VERSION"));
        assert_eq!(AUTHORS, env!("CARGO_PKG_AUTHORS"));
    }

    #[test]
    fn test_address_reexport() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.as_usize(), 0x1000);
        assert!(Address::null().is_null());
    }

    #[test]
    fn test_memory_value_reexport() {
        let value = MemoryValue::U32(42);
        assert_eq!(value.value_type(), ValueType::U32);
        assert_eq!(value.size(), 4);

        let string_val = MemoryValue::String("test".to_string());
        assert_eq!(string_val.value_type(), ValueType::String);
    }

    #[test]
    fn test_memory_error_reexport() {
        let error = MemoryError::ProcessGone(42);
        assert_eq!(error.to_string(), "Process 42 does not exist");

        let result: MemoryResult<u32> = Err(MemoryError::invalid_state("idle"));
        assert!(result.is_err());
    }

    #[test]
    fn test_value_type_reexport() {
        assert_eq!(ValueType::U32.size(), Some(4));
        assert_eq!(ValueType::String.size(), None);
        assert_eq!("double".parse::<ValueType>().unwrap(), ValueType::F64);
    }
}
