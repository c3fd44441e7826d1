//! TOML parsing, serialization, validation, and discovery for platform definitions.
//!
//! Platform definitions are stored as `.platform.toml` files in the `platforms/`
//! directory next to the guest images. This module is the configuration loader:
//! it turns presets and files into a [`PlatformConfig`] and checks the memory map
//! before the snapshot is handed to the execution engine.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};
use crate::platform::{resolve_platform, PlatformConfig};
use crate::region::RegionKind;

/// How serious a validation issue is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A validation issue found in a platform definition.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    fn error(message: String) -> Self {
        Self {
            severity: Severity::Error,
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Severity::Warning,
            message,
        }
    }
}

/// Load a platform from a `.platform.toml` file.
pub fn load_platform_toml(path: &Path) -> Result<PlatformConfig> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    let platform = parse_platform_toml(&content)?;
    tracing::debug!(path = %path.display(), platform = platform.name(), "loaded platform file");
    Ok(platform)
}

/// Resolve a built-in preset name, or else load `name_or_path` as a file path.
pub fn load_platform(name_or_path: &str) -> Result<PlatformConfig> {
    if let Some(platform) = resolve_platform(name_or_path) {
        return Ok(platform);
    }
    let path = Path::new(name_or_path);
    if path.exists() {
        load_platform_toml(path)
    } else {
        Err(ConfigError::UnknownPlatform {
            name: name_or_path.into(),
        })
    }
}

/// Parse a platform from a TOML string.
pub fn parse_platform_toml(toml_str: &str) -> Result<PlatformConfig> {
    let platform: PlatformConfig = toml::from_str(toml_str)?;
    Ok(platform)
}

/// Serialize a platform to pretty TOML.
pub fn platform_to_toml(platform: &PlatformConfig) -> Result<String> {
    let toml_str = toml::to_string_pretty(platform)?;
    Ok(toml_str)
}

/// Check a platform definition and return every issue, errors and warnings alike.
pub fn lint_platform(platform: &PlatformConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let regions = platform.memory_regions();

    // 1. RAM must exist
    if platform.ram_size() == 0 {
        issues.push(ValidationIssue::error("RAM size is zero".into()));
    }

    // 2. ROM and CLINT may be absent, but that is unusual
    for kind in [RegionKind::Rom, RegionKind::Clint] {
        if platform.region(kind).size == 0 {
            issues.push(ValidationIssue::warning(format!("{kind} size is zero")));
        }
    }

    // 3. No region wraps past the top of the address space
    for r in &regions {
        if r.overflows() {
            issues.push(ValidationIssue::error(format!(
                "{} region 0x{:X} + 0x{:X} overflows the address space",
                r.kind, r.base, r.size
            )));
        }
    }

    // 4. Non-empty regions don't overlap (pairwise check)
    for i in 0..regions.len() {
        for j in (i + 1)..regions.len() {
            let a = &regions[i];
            let b = &regions[j];
            if a.size == 0 || b.size == 0 {
                continue;
            }
            if a.overlaps(b) {
                issues.push(ValidationIssue::error(format!(
                    "{} (0x{:X}..0x{:X}) and {} (0x{:X}..0x{:X}) overlap",
                    a.kind,
                    a.base,
                    a.end(),
                    b.kind,
                    b.base,
                    b.end()
                )));
            }
        }
    }

    // 5. tohost should be a RAM word the guest can store to
    let ram = platform.region(RegionKind::Ram);
    if platform.ram_size() != 0 && !ram.contains(platform.htif_tohost()) {
        issues.push(ValidationIssue::warning(format!(
            "htif-tohost 0x{:X} is outside RAM (0x{:X}..0x{:X})",
            platform.htif_tohost(),
            ram.base,
            ram.end()
        )));
    }
    if platform.htif_tohost() % 8 != 0 {
        issues.push(ValidationIssue::warning(format!(
            "htif-tohost 0x{:X} is not 8-byte aligned",
            platform.htif_tohost()
        )));
    }

    // 6. RAM starts on a page boundary
    if platform.ram_base() % 0x1000 != 0 {
        issues.push(ValidationIssue::warning(format!(
            "RAM base 0x{:X} is not 4 KiB aligned",
            platform.ram_base()
        )));
    }

    issues
}

/// Validate a platform definition for structural correctness.
///
/// Returns `Ok(())` if no issue is an error, or `Err(issues)` with every
/// issue found (warnings included).
pub fn validate_platform(
    platform: &PlatformConfig,
) -> std::result::Result<(), Vec<ValidationIssue>> {
    let issues = lint_platform(platform);
    if issues.iter().any(|i| i.severity == Severity::Error) {
        Err(issues)
    } else {
        Ok(())
    }
}

/// Like [`validate_platform`], folding the errors into a single [`ConfigError`].
pub fn ensure_valid(platform: &PlatformConfig) -> Result<()> {
    validate_platform(platform).map_err(|issues| ConfigError::Validation {
        detail: issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    })
}

/// Generate a template `.platform.toml` for a new platform.
///
/// Seeds from the default RV64 machine with the given custom name.
pub fn generate_template(name: &str) -> Result<String> {
    let platform = PlatformConfig::sail_default().with_name(name, "0.1.0");
    platform_to_toml(&platform)
}

/// Discover all `.platform.toml` files in a project's `platforms/` directory.
///
/// Returns a list of (platform_name, file_path) pairs.
pub fn discover_platforms(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let platforms_dir = project_dir.join("platforms");
    if !platforms_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut platforms = Vec::new();
    for entry in std::fs::read_dir(&platforms_dir)? {
        let path = entry?.path();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".platform.toml"))
            .map(str::to_string);
        if let Some(name) = name {
            platforms.push((name, path));
        }
    }
    platforms.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(platforms)
}
