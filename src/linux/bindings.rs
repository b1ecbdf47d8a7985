//! Safe wrappers around the cross-process vector I/O syscalls

use super::error_codes::AccessFault;
use crate::core::types::{Address, ProcessId};

/// Reads up to `buffer.len()` bytes at `address` in `pid` into `buffer`.
///
/// Returns the number of bytes transferred, which may be smaller than
/// requested when the remote range crosses into an unmapped page.
pub fn process_vm_read(
    pid: ProcessId,
    address: Address,
    buffer: &mut [u8],
) -> Result<usize, AccessFault> {
    let local = libc::iovec {
        iov_base: buffer.as_mut_ptr().cast(),
        iov_len: buffer.len(),
    };
    let remote = libc::iovec {
        iov_base: address.as_usize() as *mut libc::c_void,
        iov_len: buffer.len(),
    };

    // SAFETY: `local` describes exactly `buffer`, which is valid for writes for
    // its whole length; the kernel validates the remote range itself.
    let transferred = unsafe { libc::process_vm_readv(pid, &local, 1, &remote, 1, 0) };

    if transferred < 0 {
        Err(AccessFault::last_os_error())
    } else {
        Ok(transferred as usize)
    }
}

/// Writes `data` to `address` in `pid`, returning the number of bytes written
pub fn process_vm_write(pid: ProcessId, address: Address, data: &[u8]) -> Result<usize, AccessFault> {
    let local = libc::iovec {
        iov_base: data.as_ptr() as *mut libc::c_void,
        iov_len: data.len(),
    };
    let remote = libc::iovec {
        iov_base: address.as_usize() as *mut libc::c_void,
        iov_len: data.len(),
    };

    // SAFETY: the kernel only reads from the local iovec, which covers `data`.
    let transferred = unsafe { libc::process_vm_writev(pid, &local, 1, &remote, 1, 0) };

    if transferred < 0 {
        Err(AccessFault::last_os_error())
    } else {
        Ok(transferred as usize)
    }
}

/// Effective user id of this process
pub fn effective_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() }
}
