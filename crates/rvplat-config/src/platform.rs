//! The platform configuration snapshot.
//!
//! A [`PlatformConfig`] is populated once, before the first instruction
//! executes, and is read-only afterwards. The execution engine holds it behind
//! an `Arc` and reads it through the accessors below; nothing in this crate
//! mutates a snapshot that has been handed out.
//!
//! The snapshot performs no validation of its own. Range checks (overlap
//! between RAM and ROM, overflow, tohost placement) belong to the loader in
//! [`crate::parse`].

use serde::{Deserialize, Serialize};

use crate::region::{MemoryRegion, RegionKind};
use crate::MachWord;

/// Immutable machine configuration consumed by the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformConfig {
    name: String,
    version: String,
    #[serde(default)]
    enable_dirty_update: bool,
    #[serde(default)]
    enable_misaligned_access: bool,
    #[serde(default)]
    mtval_has_illegal_inst_bits: bool,
    #[serde(with = "crate::word")]
    ram_base: MachWord,
    #[serde(with = "crate::word")]
    ram_size: MachWord,
    #[serde(with = "crate::word")]
    rom_base: MachWord,
    #[serde(with = "crate::word")]
    rom_size: MachWord,
    #[serde(with = "crate::word")]
    clint_base: MachWord,
    #[serde(with = "crate::word")]
    clint_size: MachWord,
    #[serde(with = "crate::word")]
    htif_tohost: MachWord,
}

impl PlatformConfig {
    /// The default RV64 machine: 64 MiB of RAM at `0x8000_0000`, a 256-byte
    /// boot ROM at `0x1000`, the CLINT at `0x0200_0000`, and `tohost` just
    /// past the first RAM page. All feature flags are off.
    pub fn sail_default() -> Self {
        Self {
            name: "rv64-default".into(),
            version: "1.0".into(),
            enable_dirty_update: false,
            enable_misaligned_access: false,
            mtval_has_illegal_inst_bits: false,
            ram_base: 0x8000_0000,
            ram_size: 0x0400_0000, // 64 MiB
            rom_base: 0x0000_1000,
            rom_size: 0x0000_0100,
            clint_base: 0x0200_0000,
            clint_size: 0x000C_0000,
            htif_tohost: 0x8000_1000,
        }
    }

    /// A Spike-compatible machine: 2 GiB of RAM, a 4 KiB boot ROM, hardware
    /// dirty-bit updates and misaligned accesses enabled.
    pub fn spike() -> Self {
        Self {
            name: "spike".into(),
            version: "1.0".into(),
            enable_dirty_update: true,
            enable_misaligned_access: true,
            ram_size: 0x8000_0000, // 2 GiB
            rom_size: 0x0000_1000,
            ..Self::sail_default()
        }
    }

    /// Platform name (e.g., "rv64-default", "spike").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Platform definition version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the hardware updates PTE accessed/dirty bits itself.
    pub fn enable_dirty_update(&self) -> bool {
        self.enable_dirty_update
    }

    /// Whether misaligned loads and stores are performed instead of trapping.
    pub fn enable_misaligned_access(&self) -> bool {
        self.enable_misaligned_access
    }

    /// Whether an illegal-instruction trap writes the instruction bits to `mtval`.
    pub fn mtval_has_illegal_inst_bits(&self) -> bool {
        self.mtval_has_illegal_inst_bits
    }

    /// Base address of main memory.
    pub fn ram_base(&self) -> MachWord {
        self.ram_base
    }

    /// Size of main memory in bytes.
    pub fn ram_size(&self) -> MachWord {
        self.ram_size
    }

    /// Base address of the boot ROM.
    pub fn rom_base(&self) -> MachWord {
        self.rom_base
    }

    /// Size of the boot ROM in bytes.
    pub fn rom_size(&self) -> MachWord {
        self.rom_size
    }

    /// Base address of the CLINT register block.
    pub fn clint_base(&self) -> MachWord {
        self.clint_base
    }

    /// Size of the CLINT register block in bytes.
    pub fn clint_size(&self) -> MachWord {
        self.clint_size
    }

    /// Address of the HTIF `tohost` word.
    pub fn htif_tohost(&self) -> MachWord {
        self.htif_tohost
    }

    /// The RAM, ROM, and CLINT regions, in that order.
    pub fn memory_regions(&self) -> [MemoryRegion; 3] {
        RegionKind::ALL.map(|kind| self.region(kind))
    }

    /// The region of the given kind.
    pub fn region(&self, kind: RegionKind) -> MemoryRegion {
        let (base, size) = match kind {
            RegionKind::Ram => (self.ram_base, self.ram_size),
            RegionKind::Rom => (self.rom_base, self.rom_size),
            RegionKind::Clint => (self.clint_base, self.clint_size),
        };
        MemoryRegion { kind, base, size }
    }

    /// The first region (RAM, ROM, CLINT order) containing `addr`.
    pub fn region_containing(&self, addr: MachWord) -> Option<MemoryRegion> {
        self.memory_regions().into_iter().find(|r| r.contains(addr))
    }

    /// Rename the platform.
    pub fn with_name(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.name = name.into();
        self.version = version.into();
        self
    }

    /// Set hardware PTE dirty-bit updates.
    pub fn with_dirty_update(mut self, enabled: bool) -> Self {
        self.enable_dirty_update = enabled;
        self
    }

    /// Set whether misaligned accesses are performed.
    pub fn with_misaligned_access(mut self, enabled: bool) -> Self {
        self.enable_misaligned_access = enabled;
        self
    }

    /// Set whether illegal-instruction traps fill `mtval`.
    pub fn with_mtval_illegal_inst_bits(mut self, enabled: bool) -> Self {
        self.mtval_has_illegal_inst_bits = enabled;
        self
    }

    /// Replace the RAM region.
    pub fn with_ram(mut self, base: MachWord, size: MachWord) -> Self {
        self.ram_base = base;
        self.ram_size = size;
        self
    }

    /// Replace the ROM region.
    pub fn with_rom(mut self, base: MachWord, size: MachWord) -> Self {
        self.rom_base = base;
        self.rom_size = size;
        self
    }

    /// Replace the CLINT region.
    pub fn with_clint(mut self, base: MachWord, size: MachWord) -> Self {
        self.clint_base = base;
        self.clint_size = size;
        self
    }

    /// Move the HTIF `tohost` word.
    pub fn with_htif_tohost(mut self, addr: MachWord) -> Self {
        self.htif_tohost = addr;
        self
    }
}

/// Resolve a built-in platform name to its configuration.
pub fn resolve_platform(name: &str) -> Option<PlatformConfig> {
    match name {
        "rv64-default" => Some(PlatformConfig::sail_default()),
        "spike" => Some(PlatformConfig::spike()),
        _ => None,
    }
}

/// List all built-in platform names with a one-line description.
pub fn builtin_platforms() -> Vec<(&'static str, &'static str)> {
    vec![
        ("rv64-default", "RV64 reference machine (64 MiB RAM, flags off)"),
        (
            "spike",
            "Spike-compatible machine (2 GiB RAM, dirty update + misaligned)",
        ),
    ]
}
