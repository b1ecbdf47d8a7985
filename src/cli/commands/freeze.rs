use super::{index_width, parse_index, parse_typed_value, require_args, split_json_flag};
use crate::cli::session::Session;
use crate::cli::tokenize::join_args;
use crate::cli::Command;
use crate::core::types::{Address, MemoryAddress, MemoryError, MemoryResult};
use crate::memory::access::MemoryAccess;
use crate::memory::regions::find_region;
use std::fmt::Write as _;

/// `freeze <keyword> [args...]`
///
/// For `add` and `modify` the value is a single argument (quote text that
/// contains spaces); whatever follows it is the note.
pub struct FreezeCommand;

impl<M: MemoryAccess + 'static> Command<M> for FreezeCommand {
    fn name(&self) -> &'static str {
        "freeze"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        let Some((keyword, rest)) = args.split_first() else {
            return Err(MemoryError::invalid_argument("missing keyword argument"));
        };

        match keyword.as_str() {
            "list" => list(session, rest),
            "add" => add(session, rest),
            "modify" => modify(session, rest),
            "enable" | "disable" | "remove" => {
                require_args(rest, 1)?;
                let freezer = session.freezer();
                let index = parse_index(&rest[0])?;

                match (keyword.as_str(), index) {
                    ("enable", Some(i)) => freezer.enable_address(i)?,
                    ("enable", None) => freezer.enable_all_addresses(),
                    ("disable", Some(i)) => freezer.disable_address(i)?,
                    ("disable", None) => freezer.disable_all_addresses(),
                    (_, Some(i)) => freezer.remove_address(i)?,
                    (_, None) => freezer.remove_all_addresses(),
                }
                Ok(String::new())
            }
            other => Err(MemoryError::invalid_argument(format!("invalid keyword '{}'", other))),
        }
    }

    fn help(&self) -> &'static str {
        "Usage: freeze <keyword> [args...]\n\n\
         Continuously overwrites values in memory addresses, effectively \"freezing\" them.\n\n\
         Keywords with no args required:\n\
         list [--json] -- Lists the frozen memory addresses in the following format:\n\
         \t[index] [enabled] [address] [pathname] [type: value] [note]\n\n\
         Keywords that require 1 argument:\n\
         remove <index/all> -- Removes the address in the given index, or removes all addresses.\n\
         enable <index/all> -- Freezes the address in the given index, or all addresses.\n\
         disable <index/all> -- Stops freezing the address in the given index, or all addresses.\n\n\
         Keywords that require 3 arguments:\n\
         add <address> <type> <value> [note] -- Adds the address to the freezing list, which will\n\
         \twrite <value> to <address> continuously. Added addresses are disabled until enabled.\n\
         modify <index> <type> <value> [note] -- Replaces the value of the address in the given index.\n\n\
         Quote string values that contain spaces.\n"
    }
}

fn list<M: MemoryAccess + 'static>(session: &Session<M>, args: &[String]) -> MemoryResult<String> {
    let (json, _) = split_json_flag(args);
    let entries = session.freezer().entries();

    if json {
        return Ok(serde_json::to_string_pretty(&entries)? + "\n");
    }
    if entries.is_empty() {
        return Ok("No memory addresses to list.\n".to_string());
    }

    let width = index_width(entries.len());
    let mut out = String::new();
    for (index, entry) in entries.iter().enumerate() {
        let _ = writeln!(out, "[{:>width$}] {}", index, entry, width = width);
    }
    Ok(out)
}

fn add<M: MemoryAccess + 'static>(session: &Session<M>, args: &[String]) -> MemoryResult<String> {
    require_args(args, 3)?;
    let address = Address::from_hex(&args[0])?;
    let value = parse_typed_value(&args[1], &args[2..3])?;
    let note = join_args(&args[3..]);

    let regions = session.regions()?;
    let region = find_region(&regions, address)?.clone();
    let index = session.freezer().add_address(
        MemoryAddress::new(address, region),
        value.value_type,
        &value.text,
        value.bytes,
        &note,
    )?;

    Ok(format!(
        "Added {:x} at index {} (disabled, use 'freeze enable {}' to start freezing).\n",
        address, index, index
    ))
}

fn modify<M: MemoryAccess + 'static>(session: &Session<M>, args: &[String]) -> MemoryResult<String> {
    require_args(args, 3)?;
    let index = parse_index(&args[0])?
        .ok_or_else(|| MemoryError::invalid_argument("modify takes a single index"))?;
    let value = parse_typed_value(&args[1], &args[2..3])?;
    let note = join_args(&args[3..]);

    session
        .freezer()
        .modify_address(index, value.value_type, &value.text, value.bytes, &note)?;
    Ok(String::new())
}
