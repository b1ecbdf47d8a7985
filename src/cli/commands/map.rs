use super::{index_width, split_json_flag};
use crate::cli::session::Session;
use crate::cli::Command;
use crate::core::types::{MemoryRegion, MemoryResult};
use crate::memory::access::MemoryAccess;
use std::fmt::Write as _;

/// `map [--json]`
pub struct MapCommand;

impl<M: MemoryAccess + 'static> Command<M> for MapCommand {
    fn name(&self) -> &'static str {
        "map"
    }

    fn execute(&self, session: &mut Session<M>, args: &[String]) -> MemoryResult<String> {
        let (json, _) = split_json_flag(args);
        let regions = session.regions()?;

        if json {
            return Ok(serde_json::to_string_pretty(&regions)? + "\n");
        }
        Ok(format_regions(&regions))
    }

    fn help(&self) -> &'static str {
        "Usage: map [--json]\n\n\
         If attached to a process, print the memory regions map (/proc/pid/maps)\n\
         The fields are the following in order:\n\
         <memory address range> <range length> <permissions> <pathname>\n"
    }
}

fn format_regions(regions: &[MemoryRegion]) -> String {
    if regions.is_empty() {
        return "No memory regions were found.\n".to_string();
    }

    let width = index_width(regions.len());
    let mut out = String::new();
    let mut total = 0usize;

    for (index, region) in regions.iter().enumerate() {
        total += region.len();
        let _ = writeln!(
            out,
            "[{:>width$}] {:x}-{:x}\t{} bytes\t[{}]\t{}",
            index,
            region.start,
            region.end,
            region.len(),
            region.permissions,
            region.path,
            width = width
        );
    }

    let _ = writeln!(out, "\nTotal: {} bytes in {} memory regions.", total, regions.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RegionPermissions;

    #[test]
    fn test_format_regions() {
        let regions = vec![
            MemoryRegion::new(0x1000, 0x2000, RegionPermissions::parse("r-xp"), "/bin/true"),
            MemoryRegion::new(0x3000, 0x3100, RegionPermissions::parse("rw-p"), "[heap]"),
        ];
        let text = format_regions(&regions);
        assert!(text.starts_with(
            "[0] 0x0000000000001000-0x0000000000002000\t4096 bytes\t[r-xp]\t/bin/true\n"
        ));
        assert!(text.ends_with("\nTotal: 4352 bytes in 2 memory regions.\n"));
    }

    #[test]
    fn test_format_no_regions() {
        assert_eq!(format_regions(&[]), "No memory regions were found.\n");
    }
}
