use super::require_args;
use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{Address, MemoryError, MemoryResult};
use crate::memory::access::MemoryAccess;
use std::fmt::Write as _;

const BYTES_PER_LINE: usize = 16;

/// `dump <address> <length>`
pub struct DumpCommand;

impl<M: MemoryAccess + 'static> Command<M> for DumpCommand {
    fn name(&self) -> &'static str {
        "dump"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        require_args(args, 2)?;
        let address = Address::from_hex(&args[0])?;
        let length: usize = args[1]
            .parse()
            .map_err(|_| MemoryError::invalid_argument(format!("invalid length '{}'", args[1])))?;

        let max = session.config().memory.max_dump_size;
        if length > max {
            return Err(MemoryError::invalid_argument(format!(
                "length {} exceeds the maximum dump size of {} bytes",
                length, max
            )));
        }

        let data = session.read(address, length)?;
        let mut out = hex_dump(address, &data);
        if data.len() < length {
            let _ = writeln!(out, "Only {}/{} bytes could be read.", data.len(), length);
        }
        Ok(out)
    }

    fn help(&self) -> &'static str {
        "Usage: dump <address> <length>\n\
         Outputs a hex dump with the given length of the data in the given address.\n\
         The memory address has to be in hexadecimal.\n"
    }
}

/// Formats `data` as lines of 16 hex bytes followed by their printable ASCII
pub fn hex_dump(base: Address, data: &[u8]) -> String {
    let mut out = String::new();

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        let _ = write!(out, "0x{:x}: ", base.as_usize() + line * BYTES_PER_LINE);
        for byte in chunk {
            out.push_str(&hex::encode([*byte]));
            out.push(' ');
        }
        for _ in chunk.len()..BYTES_PER_LINE {
            out.push_str("   ");
        }

        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        let _ = writeln!(out, "|{}|", ascii);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_lines() {
        let data: Vec<u8> = (0x41..0x41 + 18).collect();
        let dump = hex_dump(Address::new(0x1000), &data);
        let lines: Vec<&str> = dump.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "0x1000: 41 42 43 44 45 46 47 48 49 4a 4b 4c 4d 4e 4f 50 |ABCDEFGHIJKLMNOP|"
        );
        assert_eq!(lines[1], format!("0x1010: 51 52 {}|QR|", "   ".repeat(14)));
    }

    #[test]
    fn test_hex_dump_unprintable() {
        let dump = hex_dump(Address::new(0), &[0x00, b'a', 0xff]);
        assert!(dump.ends_with("|.a.|\n"));
        assert!(hex_dump(Address::new(0), &[]).is_empty());
    }
}
