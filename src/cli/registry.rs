//! Command lookup and dispatch

use super::commands;
use super::session::Session;
use super::tokenize::tokenize;
use super::Command;
use crate::memory::access::MemoryAccess;
use std::collections::BTreeMap;
use tracing::debug;

/// What the shell should do after one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Blank input
    Empty,
    /// Command succeeded; text for stdout (may be empty)
    Output(String),
    /// Command failed; text for stderr
    Failed(String),
    Exit,
}

/// Maps command names to their implementations
pub struct CommandRegistry<M: MemoryAccess + 'static> {
    commands: BTreeMap<&'static str, Box<dyn Command<M>>>,
}

impl<M: MemoryAccess + 'static> Default for CommandRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MemoryAccess + 'static> CommandRegistry<M> {
    /// Registry with every built-in command
    pub fn new() -> Self {
        let mut registry = Self {
            commands: BTreeMap::new(),
        };
        registry.register(Box::new(commands::PidCommand));
        registry.register(Box::new(commands::MapCommand));
        registry.register(Box::new(commands::DumpCommand));
        registry.register(Box::new(commands::WriteCommand));
        registry.register(Box::new(commands::FindCommand));
        registry.register(Box::new(commands::ScanCommand));
        registry.register(Box::new(commands::FreezeCommand));
        registry
    }

    pub fn register(&mut self, command: Box<dyn Command<M>>) {
        self.commands.insert(command.name(), command);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command<M>> {
        self.commands.get(name).map(|command| command.as_ref())
    }

    /// Registered command names in alphabetical order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    /// Tokenizes and runs one line of input
    pub fn execute_line(&self, session: &mut Session<M>, line: &str) -> LineOutcome {
        let tokens = tokenize(line);
        let Some((name, args)) = tokens.split_first() else {
            return LineOutcome::Empty;
        };

        match name.as_str() {
            "exit" => LineOutcome::Exit,
            "help" => match self.help(args.first().map(String::as_str)) {
                Some(text) => LineOutcome::Output(text),
                None => LineOutcome::Failed(format!("Command {} not found.", args[0])),
            },
            _ => match self.commands.get(name.as_str()) {
                Some(command) => {
                    debug!(command = %name, ?args, "executing");
                    match command.execute(session, args) {
                        Ok(output) => LineOutcome::Output(output),
                        Err(e) => LineOutcome::Failed(format!("{}: {}", name, e)),
                    }
                }
                None => LineOutcome::Failed(format!("Command {} not found.", name)),
            },
        }
    }

    /// Command list, or the usage of one command
    pub fn help(&self, command: Option<&str>) -> Option<String> {
        match command {
            None => {
                let mut text = String::from("Available commands:\n");
                for name in self.names().chain(["help", "exit"]) {
                    text.push_str(&format!("- {}\n", name));
                }
                Some(text)
            }
            Some("help") => Some("Usage: help [command]\n".to_string()),
            Some("exit") => Some("Usage: exit\n".to_string()),
            Some(name) => self.get(name).map(|command| command.help().to_string()),
        }
    }
}
