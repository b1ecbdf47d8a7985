use super::{format_address_list, parse_typed_value, require_args, split_json_flag};
use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{ComparisonOp, MemoryResult};
use crate::memory::access::MemoryAccess;

/// `find <type> <value...> [--json]`; leaves the scan state alone
pub struct FindCommand;

impl<M: MemoryAccess + 'static> Command<M> for FindCommand {
    fn name(&self) -> &'static str {
        "find"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        let (json, args) = split_json_flag(args);
        require_args(&args, 2)?;
        let value = parse_typed_value(&args[0], &args[1..])?;

        let pid = session.require_pid()?;
        let regions = session.regions()?;
        let scanner = session.scanner();
        let found = scanner.engine().find_occurrences(
            scanner.memory().as_ref(),
            pid,
            regions.as_slice(),
            value.value_type,
            &value.bytes,
            ComparisonOp::Equal,
        )?;

        if json {
            return Ok(serde_json::to_string_pretty(&found)? + "\n");
        }
        if found.is_empty() {
            return Ok("No matches found.\n".to_string());
        }
        Ok(format_address_list(session, &found, None))
    }

    fn help(&self) -> &'static str {
        "Usage: find <type> <value> [--json]\n\n\
         Lists the memory addresses where the given value was found.\n\
         Unlike scan, the results are not kept.\n\n\
         The <type> argument can be one of the following:\n\
         [u]int8, [u]int16, [u]int32, [u]int64, float, double, string\n\
         The 'u' prefix tells the program to use the unsigned type.\n"
    }
}
