//! Command-line overrides layered on top of a loaded configuration.

use crate::platform::PlatformConfig;
use crate::MachWord;

/// Optional per-field replacements applied before the snapshot is frozen.
///
/// `None` leaves the loaded value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub enable_dirty_update: Option<bool>,
    pub enable_misaligned_access: Option<bool>,
    pub mtval_has_illegal_inst_bits: Option<bool>,
    pub ram_size: Option<MachWord>,
    pub htif_tohost: Option<MachWord>,
}

impl ConfigOverrides {
    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Produce the final configuration.
    pub fn apply(&self, mut config: PlatformConfig) -> PlatformConfig {
        if let Some(enabled) = self.enable_dirty_update {
            config = config.with_dirty_update(enabled);
        }
        if let Some(enabled) = self.enable_misaligned_access {
            config = config.with_misaligned_access(enabled);
        }
        if let Some(enabled) = self.mtval_has_illegal_inst_bits {
            config = config.with_mtval_illegal_inst_bits(enabled);
        }
        if let Some(size) = self.ram_size {
            let base = config.ram_base();
            config = config.with_ram(base, size);
        }
        if let Some(addr) = self.htif_tohost {
            config = config.with_htif_tohost(addr);
        }
        if !self.is_empty() {
            tracing::debug!(platform = config.name(), overrides = ?self, "applied config overrides");
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overrides_are_identity() {
        let base = PlatformConfig::sail_default();
        let overrides = ConfigOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(overrides.apply(base.clone()), base);
    }

    #[test]
    fn overrides_replace_selected_fields() {
        let overrides = ConfigOverrides {
            enable_misaligned_access: Some(true),
            ram_size: Some(0x1000_0000),
            ..Default::default()
        };
        let p = overrides.apply(PlatformConfig::sail_default());
        assert!(p.enable_misaligned_access());
        assert!(!p.enable_dirty_update());
        assert_eq!(p.ram_base(), 0x8000_0000);
        assert_eq!(p.ram_size(), 0x1000_0000);
        assert_eq!(p.htif_tohost(), 0x8000_1000);
    }

    #[test]
    fn overrides_can_disable_flags() {
        let overrides = ConfigOverrides {
            enable_dirty_update: Some(false),
            mtval_has_illegal_inst_bits: Some(true),
            htif_tohost: Some(0x8000_0000),
            ..Default::default()
        };
        let p = overrides.apply(PlatformConfig::spike());
        assert!(!p.enable_dirty_update());
        assert!(p.mtval_has_illegal_inst_bits());
        assert_eq!(p.htif_tohost(), 0x8000_0000);
    }
}
