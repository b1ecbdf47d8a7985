use super::{format_address_list, parse_typed_value, require_args, split_json_flag};
use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{ComparisonOp, MemoryError, MemoryResult};
use crate::memory::access::MemoryAccess;
use std::fmt::Write as _;

/// `scan <keyword> [type] [value...]`
pub struct ScanCommand;

impl<M: MemoryAccess + 'static> Command<M> for ScanCommand {
    fn name(&self) -> &'static str {
        "scan"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        let Some((keyword, rest)) = args.split_first() else {
            return Err(MemoryError::invalid_argument("missing keyword argument"));
        };

        match keyword.as_str() {
            "clear" => {
                session.scanner_mut().clear();
                Ok("Scan cleared.\n".to_string())
            }
            "undo" => {
                session.scanner_mut().undo()?;
                Ok(format!(
                    "Restored {} address(es).\n",
                    session.scanner().current().len()
                ))
            }
            "list" => list(session, rest),
            "write" => write_all(session, rest),
            _ => {
                let op: ComparisonOp = keyword.parse()?;
                require_args(rest, 2)?;
                let value = parse_typed_value(&rest[0], &rest[1..])?;

                let count = session.scan(value.value_type, &value.bytes, op)?;
                Ok(format!("Found {} address(es).\n", count))
            }
        }
    }

    fn help(&self) -> &'static str {
        "Usage: scan <keyword> [type] [value]\n\n\
         Scans the memory of a process and keeps track of the addresses where the value was found.\n\
         Subsequent scans check the values in the saved memory addresses.\n\n\
         Keywords with no args required:\n\
         clear -- Clears the saved addresses.\n\
         undo -- Undo the last scan. (depth of 1 scan)\n\
         list [--json] -- List the saved memory addresses.\n\n\
         Keywords that require type and value:\n\
         == -- Scans for addresses with a value equal to <value> in the given <type>.\n\
         != -- Scans for addresses which do not have <value>.\n\
         > -- Scans for addresses where the value is greater than the given <value>.\n\
         < -- Scans for addresses where the value is less than the given <value>.\n\
         >= -- Scans for addresses where the value is greater or equal to <value>.\n\
         <= -- Scans for addresses where the value is less or equal to <value>.\n\
         write -- Writes the <value> with the given <type> to all the saved memory addresses.\n"
    }
}

fn list<M: MemoryAccess + 'static>(session: &Session<M>, args: &[String]) -> MemoryResult<String> {
    let (json, _) = split_json_flag(args);
    let scanner = session.scanner();
    let current = scanner.current();

    if json {
        return Ok(serde_json::to_string_pretty(current)? + "\n");
    }
    if current.is_empty() {
        return Err(MemoryError::invalid_state("No memory addresses to list."));
    }
    Ok(format_address_list(session, current, scanner.last_value_type()))
}

/// Writes one value to every writable address of the current set
fn write_all<M: MemoryAccess + 'static>(
    session: &Session<M>,
    args: &[String],
) -> MemoryResult<String> {
    require_args(args, 2)?;
    let value = parse_typed_value(&args[0], &args[1..])?;
    session.require_pid()?;

    let current = session.scanner().current();
    let mut out = String::new();
    let mut written = 0;

    for target in current.iter().filter(|t| t.region.permissions.writable) {
        match session.write(target.address, &value.bytes) {
            Ok(n) if n == value.bytes.len() => written += 1,
            Ok(n) => {
                let _ = writeln!(
                    out,
                    "{:x}: partial write of {}/{} bytes",
                    target.address,
                    n,
                    value.bytes.len()
                );
            }
            Err(e) => {
                let _ = writeln!(out, "{:x}: {}", target.address, e);
            }
        }
    }

    let _ = writeln!(out, "Written to {}/{} memory addresses.", written, current.len());
    Ok(out)
}
