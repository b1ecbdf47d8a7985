//! Built-in shell commands

mod dump;
mod find;
mod freeze;
mod map;
mod pid;
mod scan;
mod write;

pub use dump::{hex_dump, DumpCommand};
pub use find::FindCommand;
pub use freeze::FreezeCommand;
pub use map::MapCommand;
pub use pid::PidCommand;
pub use scan::ScanCommand;
pub use write::WriteCommand;

use super::session::Session;
use super::tokenize::join_args;
use crate::core::types::{MemoryAddress, MemoryError, MemoryResult, MemoryValue, ValueType};
use crate::memory::access::MemoryAccess;
use std::fmt::Write as _;

/// Flag that switches listings to JSON
const JSON_FLAG: &str = "--json";

/// Removes `--json` from `args`, reporting whether it was present
fn split_json_flag(args: &[String]) -> (bool, Vec<String>) {
    let json = args.iter().any(|arg| arg == JSON_FLAG);
    let rest = args.iter().filter(|arg| *arg != JSON_FLAG).cloned().collect();
    (json, rest)
}

fn require_args(args: &[String], count: usize) -> MemoryResult<()> {
    if args.len() < count {
        return Err(MemoryError::invalid_argument("missing arguments"));
    }
    Ok(())
}

/// A user-entered value together with its in-memory bytes
#[derive(Debug, Clone, PartialEq)]
struct TypedValue {
    value_type: ValueType,
    text: String,
    bytes: Vec<u8>,
}

/// Parses `<type> <value...>`. Text values take every remaining argument.
fn parse_typed_value(type_arg: &str, value_args: &[String]) -> MemoryResult<TypedValue> {
    let value_type: ValueType = type_arg.parse()?;
    let text = match value_type {
        ValueType::String => join_args(value_args),
        _ => value_args
            .first()
            .cloned()
            .ok_or_else(|| MemoryError::invalid_argument("missing value"))?,
    };

    let bytes = MemoryValue::parse(&text, value_type)?.to_bytes();
    Ok(TypedValue {
        value_type,
        text,
        bytes,
    })
}

/// Parses a list index or the keyword `all`
fn parse_index(arg: &str) -> MemoryResult<Option<usize>> {
    if arg == "all" {
        return Ok(None);
    }
    arg.parse()
        .map(Some)
        .map_err(|_| MemoryError::invalid_argument(format!("invalid index '{}'", arg)))
}

fn index_width(len: usize) -> usize {
    len.saturating_sub(1).to_string().len()
}

/// One line per address, with its current value when the type is numeric
fn format_address_list<M: MemoryAccess + 'static>(
    session: &Session<M>,
    addresses: &[MemoryAddress],
    value_type: Option<ValueType>,
) -> String {
    let width = index_width(addresses.len());
    let mut out = String::new();

    for (index, found) in addresses.iter().enumerate() {
        let _ = write!(out, "[{:>width$}] {}", index, found, width = width);
        if let Some((value_type, size)) = value_type.and_then(|t| t.size().map(|size| (t, size))) {
            let value = session
                .read(found.address, size)
                .ok()
                .and_then(|bytes| MemoryValue::from_bytes(&bytes, value_type));
            match value {
                Some(value) => {
                    let _ = write!(out, " = {}", value);
                }
                None => out.push_str(" = ??"),
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{} address(es).", addresses.len());
    out
}
