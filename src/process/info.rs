//! Process information from `/proc`

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;

/// Information about a running process
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: ProcessId,
    /// Short name from `/proc/<pid>/comm`
    pub name: String,
    /// Full command line, empty for kernel threads
    pub command_line: String,
}

impl ProcessInfo {
    /// Reads name and command line of `pid`
    pub fn query(pid: ProcessId) -> MemoryResult<Self> {
        let name = read_proc_file(pid, "comm")?;
        let cmdline = read_proc_file(pid, "cmdline")?;

        Ok(ProcessInfo {
            pid,
            name: name.trim_end_matches('\n').to_string(),
            command_line: format_cmdline(&cmdline),
        })
    }

    /// Command line if there is one, otherwise the bracketed short name
    pub fn command(&self) -> String {
        if self.command_line.is_empty() {
            format!("[{}]", self.name)
        } else {
            self.command_line.clone()
        }
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.pid, self.command())
    }
}

/// Turns the NUL-separated argv of `/proc/<pid>/cmdline` into one line
fn format_cmdline(raw: &str) -> String {
    raw.split('\0')
        .filter(|arg| !arg.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn read_proc_file(pid: ProcessId, name: &str) -> MemoryResult<String> {
    let path = format!("/proc/{}/{}", pid, name);
    let bytes = fs::read(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MemoryError::ProcessGone(pid),
        ErrorKind::PermissionDenied => MemoryError::AccessDenied { pid },
        _ => MemoryError::IoError(e),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
