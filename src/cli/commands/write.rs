use super::{parse_typed_value, require_args};
use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{Address, MemoryResult};
use crate::memory::access::MemoryAccess;

/// `write <address> <type> <value...>`
pub struct WriteCommand;

impl<M: MemoryAccess + 'static> Command<M> for WriteCommand {
    fn name(&self) -> &'static str {
        "write"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        require_args(args, 3)?;
        let address = Address::from_hex(&args[0])?;
        let value = parse_typed_value(&args[1], &args[2..])?;

        let written = session.write(address, &value.bytes)?;
        if written < value.bytes.len() {
            return Ok(format!(
                "Partial write to {:x}: {}/{} bytes.\n",
                address,
                written,
                value.bytes.len()
            ));
        }
        Ok(format!("Wrote {} bytes to {:x}.\n", written, address))
    }

    fn help(&self) -> &'static str {
        "Usage: write <address> <type> <value>\n\n\
         Writes a value to a given memory address.\n\n\
         The <address> must be in hexadecimal.\n\n\
         The <type> argument can be one of the following:\n\
         [u]int8, [u]int16, [u]int32, [u]int64, float, double, string\n\
         The 'u' prefix tells the program to use the unsigned type.\n\n\
         Integer values can be written as decimal or 0x-prefixed hexadecimal numbers.\n\
         Values for float and double are decimal floating point numbers.\n\
         A string value is the rest of the line.\n"
    }
}
