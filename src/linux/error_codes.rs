//! errno handling for cross-process memory transfers

use crate::core::types::{Address, MemoryError, ProcessId};
use std::fmt;

/// Failure causes reported by `process_vm_readv` / `process_vm_writev`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessFault {
    /// EFAULT: the remote range is outside the process's mapped space
    InvalidAddress,
    /// EINVAL
    InvalidArgument,
    /// ENOMEM: could not allocate the kernel-side iovec copy
    OutOfMemory,
    /// EPERM
    AccessDenied,
    /// ESRCH
    ProcessGone,
    Os(i32),
}

impl From<i32> for AccessFault {
    fn from(errno: i32) -> Self {
        match errno {
            libc::EFAULT => AccessFault::InvalidAddress,
            libc::EINVAL => AccessFault::InvalidArgument,
            libc::ENOMEM => AccessFault::OutOfMemory,
            libc::EPERM => AccessFault::AccessDenied,
            libc::ESRCH => AccessFault::ProcessGone,
            other => AccessFault::Os(other),
        }
    }
}

impl AccessFault {
    /// Fault for the errno of the last failed call on this thread
    pub fn last_os_error() -> Self {
        let errno = std::io::Error::last_os_error().raw_os_error().unwrap_or(0);
        AccessFault::from(errno)
    }

    /// Converts the fault into the crate error for a transfer at `address` in `pid`
    pub fn into_error(self, pid: ProcessId, address: Address) -> MemoryError {
        match self {
            AccessFault::InvalidAddress => MemoryError::InvalidAddress(address.to_string()),
            AccessFault::InvalidArgument => MemoryError::invalid_argument(format!(
                "invalid arguments for transfer at {}",
                address
            )),
            AccessFault::OutOfMemory => MemoryError::OutOfMemory,
            AccessFault::AccessDenied => MemoryError::AccessDenied { pid },
            AccessFault::ProcessGone => MemoryError::ProcessGone(pid),
            AccessFault::Os(errno) => MemoryError::Os {
                errno,
                message: std::io::Error::from_raw_os_error(errno).to_string(),
            },
        }
    }
}

impl fmt::Display for AccessFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessFault::InvalidAddress => {
                write!(f, "Memory address is outside the accessible space of the process")
            }
            AccessFault::InvalidArgument => write!(f, "Invalid arguments"),
            AccessFault::OutOfMemory => write!(f, "Failed to allocate memory for iovec structures"),
            AccessFault::AccessDenied => write!(f, "Permission denied"),
            AccessFault::ProcessGone => write!(f, "Process doesn't exist"),
            AccessFault::Os(errno) => write!(f, "Unknown error: {}", errno),
        }
    }
}
