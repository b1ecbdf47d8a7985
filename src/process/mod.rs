//! Target process selection and information
//!
//! The shell works on one process at a time. [`AttachedProcess`] validates the
//! pid and hands out fresh region lists through [`RegionProvider`].

pub mod attached;
pub mod info;

pub use attached::{validate_pid, AttachedProcess, RegionProvider, StaticProcess};
pub use info::ProcessInfo;

use crate::linux::effective_uid;

/// Whether the tool runs with root privileges
pub fn is_root() -> bool {
    effective_uid() == 0
}
