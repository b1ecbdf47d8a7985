//! Interactive command shell
//!
//! Each command implements [`Command`] and is looked up by name in the
//! [`CommandRegistry`]. Commands return their output as text so the shell
//! decides where it goes.

pub mod commands;
pub mod registry;
pub mod session;
pub mod tokenize;

pub use registry::{CommandRegistry, LineOutcome};
pub use session::Session;
pub use tokenize::tokenize;

use crate::core::types::MemoryResult;
use crate::memory::access::MemoryAccess;

/// A shell command
pub trait Command<M: MemoryAccess + 'static> {
    /// Name typed at the prompt
    fn name(&self) -> &'static str;

    /// Runs the command with the arguments that follow its name
    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String>;

    /// Usage text shown by `help <name>`
    fn help(&self) -> &'static str;
}
