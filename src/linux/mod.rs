//! Linux platform layer
//!
//! Thin wrappers over the syscalls procmem needs, with errno mapped to
//! [`AccessFault`].

pub mod bindings;
pub mod error_codes;

pub use bindings::{effective_uid, process_vm_read, process_vm_write};
pub use error_codes::AccessFault;
