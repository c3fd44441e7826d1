//! Memory-map regions derived from a platform configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::MachWord;

/// The kind of a memory-map region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionKind {
    /// Main memory.
    Ram,
    /// Boot ROM.
    Rom,
    /// Core-local interrupt controller registers.
    Clint,
}

impl RegionKind {
    /// All region kinds in memory-map order.
    pub const ALL: [RegionKind; 3] = [RegionKind::Ram, RegionKind::Rom, RegionKind::Clint];

    /// Short lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            RegionKind::Ram => "ram",
            RegionKind::Rom => "rom",
            RegionKind::Clint => "clint",
        }
    }
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A contiguous region of the emulated physical address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRegion {
    /// What the region holds.
    pub kind: RegionKind,
    /// Base address.
    pub base: MachWord,
    /// Size in bytes.
    pub size: MachWord,
}

impl MemoryRegion {
    /// One past the last address, saturating at the top of the address space.
    pub fn end(&self) -> MachWord {
        self.base.saturating_add(self.size)
    }

    /// Whether the last byte lies past the top of the address space. A region
    /// ending exactly at `1 << 64` does not overflow.
    pub fn overflows(&self) -> bool {
        self.size != 0 && self.base.checked_add(self.size - 1).is_none()
    }

    /// Whether `addr` falls inside the region.
    pub fn contains(&self, addr: MachWord) -> bool {
        addr >= self.base && addr - self.base < self.size
    }

    /// Whether two regions share at least one address. Empty regions share none.
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        match (self.last(), other.last()) {
            (Some(a_last), Some(b_last)) => self.base <= b_last && other.base <= a_last,
            _ => false,
        }
    }

    fn last(&self) -> Option<MachWord> {
        (self.size != 0).then(|| self.base.saturating_add(self.size - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(base: MachWord, size: MachWord) -> MemoryRegion {
        MemoryRegion {
            kind: RegionKind::Ram,
            base,
            size,
        }
    }

    #[test]
    fn contains_is_half_open() {
        let r = region(0x1000, 0x100);
        assert!(r.contains(0x1000));
        assert!(r.contains(0x10FF));
        assert!(!r.contains(0x1100));
        assert!(!r.contains(0x0FFF));
    }

    #[test]
    fn empty_region_contains_nothing() {
        let r = region(0x1000, 0);
        assert!(!r.contains(0x1000));
    }

    #[test]
    fn overlap_detection() {
        let a = region(0x1000, 0x100);
        assert!(a.overlaps(&region(0x10F0, 0x20)));
        assert!(!a.overlaps(&region(0x1100, 0x20)));
        assert!(region(0x10F0, 0x20).overlaps(&a));
    }

    #[test]
    fn end_saturates() {
        let r = region(u64::MAX - 1, 0x10);
        assert_eq!(r.end(), u64::MAX);
        assert!(r.overflows());
        assert!(!region(0x8000_0000, 0x1000).overflows());
    }

    #[test]
    fn region_ending_at_top_of_address_space() {
        let r = region(u64::MAX - 0xFFF, 0x1000);
        assert!(!r.overflows());
        assert!(r.contains(u64::MAX));
        assert!(r.contains(u64::MAX - 0xFFF));
        assert!(!r.contains(u64::MAX - 0x1000));
        assert!(r.overlaps(&region(u64::MAX, 1)));
        assert!(region(u64::MAX, 1).overlaps(&r));
        assert!(region(u64::MAX, 2).overflows());
    }

    #[test]
    fn empty_regions_never_overlap() {
        assert!(!region(0x1000, 0).overlaps(&region(0x0F00, 0x200)));
        assert!(!region(0x0F00, 0x200).overlaps(&region(0x1000, 0)));
    }
}
