//! Custom error types for procmem

use super::{Address, ProcessId};
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Index {index} out of bounds (length {len})")]
    OutOfBounds { index: usize, len: usize },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Permission denied accessing process {pid}")]
    AccessDenied { pid: ProcessId },

    #[error("Process {0} does not exist")]
    ProcessGone(ProcessId),

    #[error("Memory address {0} is outside the accessible space of the process")]
    InvalidAddress(String),

    #[error("Failed to allocate memory for the transfer")]
    OutOfMemory,

    #[error("OS error {errno}: {message}")]
    Os { errno: i32, message: String },

    #[error("Address {0} is already being tracked")]
    DuplicateTarget(Address),

    #[error("Address {0} is in a region without write permission")]
    ReadOnlyTarget(Address),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        MemoryError::InvalidArgument(reason.into())
    }

    /// Creates an invalid state error
    pub fn invalid_state(reason: impl Into<String>) -> Self {
        MemoryError::InvalidState(reason.into())
    }

    /// Creates an out of bounds error for a collection of `len` items
    pub fn out_of_bounds(index: usize, len: usize) -> Self {
        MemoryError::OutOfBounds { index, len }
    }

    /// True for failures of the raw memory transfer itself.
    ///
    /// These are expected while scanning or freezing because the memory map of
    /// the target can change at any time, so callers recover from them locally.
    pub fn is_access_error(&self) -> bool {
        matches!(
            self,
            MemoryError::AccessDenied { .. }
                | MemoryError::ProcessGone(_)
                | MemoryError::InvalidAddress(_)
                | MemoryError::OutOfMemory
                | MemoryError::Os { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MemoryError::InvalidAddress("0x00000000deadbeef".to_string());
        assert_eq!(
            err.to_string(),
            "Memory address 0x00000000deadbeef is outside the accessible space of the process"
        );

        let err = MemoryError::AccessDenied { pid: 1234 };
        assert_eq!(err.to_string(), "Permission denied accessing process 1234");
    }

    #[test]
    fn test_all_error_variants() {
        let errors: Vec<(MemoryError, &str)> = vec![
            (
                MemoryError::invalid_argument("bad value"),
                "Invalid argument: bad value",
            ),
            (
                MemoryError::out_of_bounds(5, 2),
                "Index 5 out of bounds (length 2)",
            ),
            (
                MemoryError::invalid_state("nothing to undo"),
                "Invalid state: nothing to undo",
            ),
            (MemoryError::ProcessGone(42), "Process 42 does not exist"),
            (
                MemoryError::OutOfMemory,
                "Failed to allocate memory for the transfer",
            ),
            (
                MemoryError::Os {
                    errno: 99,
                    message: "weird".to_string(),
                },
                "OS error 99: weird",
            ),
            (
                MemoryError::DuplicateTarget(Address::new(0x1000)),
                "Address 0x0000000000001000 is already being tracked",
            ),
            (
                MemoryError::ReadOnlyTarget(Address::new(0x2000)),
                "Address 0x0000000000002000 is in a region without write permission",
            ),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_access_error_classification() {
        assert!(MemoryError::ProcessGone(1).is_access_error());
        assert!(MemoryError::AccessDenied { pid: 1 }.is_access_error());
        assert!(MemoryError::InvalidAddress("0x0".into()).is_access_error());
        assert!(MemoryError::OutOfMemory.is_access_error());

        assert!(!MemoryError::invalid_state("x").is_access_error());
        assert!(!MemoryError::out_of_bounds(1, 0).is_access_error());
        assert!(!MemoryError::ReadOnlyTarget(Address::null()).is_access_error());
    }

    #[test]
    fn test_from_implementations() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let mem_err: MemoryError = io_err.into();
        assert!(matches!(mem_err, MemoryError::IoError(_)));

        let json_err = serde_json::from_str::<String>("invalid json").unwrap_err();
        let mem_err: MemoryError = json_err.into();
        assert!(matches!(mem_err, MemoryError::JsonError(_)));
    }
}
