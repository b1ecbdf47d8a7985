//! Memory region enumeration from `/proc/<pid>/maps`

use crate::core::types::{
    Address, MemoryError, MemoryRegion, MemoryResult, ProcessId, RegionPermissions, UNKNOWN_PATH,
};
use std::fs;
use std::io::ErrorKind;

/// Minimum number of whitespace-separated fields in a maps line (no pathname)
const MIN_FIELDS: usize = 5;

/// Reads and parses the live memory map of `pid`.
///
/// Always re-reads the file; region lists are never cached.
pub fn enumerate_regions(pid: ProcessId) -> MemoryResult<Vec<MemoryRegion>> {
    let path = format!("/proc/{}/maps", pid);
    let contents = fs::read_to_string(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => MemoryError::ProcessGone(pid),
        ErrorKind::PermissionDenied => MemoryError::AccessDenied { pid },
        _ => MemoryError::IoError(e),
    })?;
    parse_maps(&contents)
}

/// Parses the full text of a maps file
pub fn parse_maps(contents: &str) -> MemoryResult<Vec<MemoryRegion>> {
    contents
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_maps_line)
        .collect()
}

/// Parses one maps line, e.g.
/// `7f1c2a000000-7f1c2a021000 rw-p 00000000 00:00 0                          [heap]`
pub fn parse_maps_line(line: &str) -> MemoryResult<MemoryRegion> {
    let malformed = || MemoryError::invalid_argument(format!("malformed maps line '{}'", line));

    let mut fields = line.split_whitespace();
    let range = fields.next().ok_or_else(malformed)?;
    let perms = fields.next().ok_or_else(malformed)?;
    let offset = fields.next().ok_or_else(malformed)?;
    let device = fields.next().ok_or_else(malformed)?;
    let inode = fields.next().ok_or_else(malformed)?;

    let (start, end) = range.split_once('-').ok_or_else(malformed)?;
    let start = usize::from_str_radix(start, 16).map_err(|_| malformed())?;
    let end = usize::from_str_radix(end, 16).map_err(|_| malformed())?;
    if end < start {
        return Err(malformed());
    }

    // The pathname may itself contain spaces
    let rest: Vec<&str> = fields.collect();
    let path = if rest.is_empty() {
        UNKNOWN_PATH.to_string()
    } else {
        rest.join(" ")
    };

    Ok(MemoryRegion {
        start: Address::new(start),
        end: Address::new(end),
        permissions: RegionPermissions::parse(perms),
        offset: u64::from_str_radix(offset, 16).map_err(|_| malformed())?,
        device: device.to_string(),
        inode: inode.parse().map_err(|_| malformed())?,
        path,
    })
}

/// Finds the region containing `address`
pub fn find_region(regions: &[MemoryRegion], address: Address) -> MemoryResult<&MemoryRegion> {
    regions
        .iter()
        .find(|region| region.contains(address))
        .ok_or_else(|| {
            MemoryError::invalid_argument(format!(
                "address {} is not in any mapped region",
                address
            ))
        })
}
