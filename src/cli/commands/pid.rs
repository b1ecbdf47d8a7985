use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use crate::memory::access::MemoryAccess;
use crate::process::ProcessInfo;

/// `pid [pid]`
pub struct PidCommand;

impl<M: MemoryAccess + 'static> Command<M> for PidCommand {
    fn name(&self) -> &'static str {
        "pid"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        if let Some(arg) = args.first() {
            let pid: ProcessId = arg
                .parse()
                .map_err(|_| MemoryError::invalid_argument(format!("invalid pid '{}'", arg)))?;
            session.attach(pid)?;
            return Ok(format!("Using pid: {}\n", describe(pid)));
        }

        Ok(match session.pid() {
            Some(pid) => format!("Currently using pid: {}\n", describe(pid)),
            None => "Currently not attached to any process.\n".to_string(),
        })
    }

    fn help(&self) -> &'static str {
        "Usage: pid [pid]\n\
         If [pid] is passed, the program will use the specified pid.\n\
         If no argument was passed then the currently used pid will be printed.\n"
    }
}

fn describe(pid: ProcessId) -> String {
    match ProcessInfo::query(pid) {
        Ok(info) => info.to_string(),
        Err(_) => pid.to_string(),
    }
}
