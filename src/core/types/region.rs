//! Memory region snapshot types

use super::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Label used when a mapping has no backing path
pub const UNKNOWN_PATH: &str = "unknown";

/// Permission flags of a mapping, as shown in the `rwxp` column of the memory map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegionPermissions {
    pub readable: bool,
    pub writable: bool,
    pub executable: bool,
    pub shared: bool,
}

impl RegionPermissions {
    /// Parses a four character permission field such as `r-xp` or `rw-s`.
    ///
    /// Missing trailing characters are treated as unset.
    pub fn parse(field: &str) -> Self {
        let bytes = field.as_bytes();
        let flag = |index: usize, expected: u8| bytes.get(index) == Some(&expected);

        RegionPermissions {
            readable: flag(0, b'r'),
            writable: flag(1, b'w'),
            executable: flag(2, b'x'),
            shared: flag(3, b's'),
        }
    }
}

impl fmt::Display for RegionPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.readable { 'r' } else { '-' },
            if self.writable { 'w' } else { '-' },
            if self.executable { 'x' } else { '-' },
            if self.shared { 's' } else { 'p' },
        )
    }
}

/// A contiguous, uniformly-permissioned range `[start, end)` of a process's address space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    pub start: Address,
    pub end: Address,
    pub permissions: RegionPermissions,
    pub offset: u64,
    pub device: String,
    pub inode: u64,
    pub path: String,
}

impl MemoryRegion {
    /// Creates an anonymous-style region with the given bounds and path
    pub fn new(
        start: usize,
        end: usize,
        permissions: RegionPermissions,
        path: impl Into<String>,
    ) -> Self {
        MemoryRegion {
            start: Address::new(start),
            end: Address::new(end),
            permissions,
            offset: 0,
            device: "00:00".to_string(),
            inode: 0,
            path: path.into(),
        }
    }

    /// Length of the region in bytes
    pub fn len(&self) -> usize {
        self.end.as_usize().saturating_sub(self.start.as_usize())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if an address lies within `[start, end)`
    pub fn contains(&self, address: Address) -> bool {
        address >= self.start && address < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parsing() {
        let perms = RegionPermissions::parse("rw-p");
        assert!(perms.readable);
        assert!(perms.writable);
        assert!(!perms.executable);
        assert!(!perms.shared);

        let perms = RegionPermissions::parse("r-xs");
        assert!(perms.readable && perms.executable && perms.shared);
        assert!(!perms.writable);

        assert_eq!(RegionPermissions::parse(""), RegionPermissions::default());
    }

    #[test]
    fn test_permission_display() {
        for field in ["rw-p", "r-xp", "---p", "rwxs"] {
            assert_eq!(RegionPermissions::parse(field).to_string(), field);
        }
    }

    #[test]
    fn test_region_bounds() {
        let region = MemoryRegion::new(0x1000, 0x3000, RegionPermissions::parse("r--p"), "a.out");
        assert_eq!(region.len(), 0x2000);
        assert!(region.contains(Address::new(0x1000)));
        assert!(region.contains(Address::new(0x2FFF)));
        assert!(!region.contains(Address::new(0x3000)));
        assert!(!region.contains(Address::new(0x0FFF)));
    }
}
