//! `rvplat platform`: listing, description, templates, and validation.

use anyhow::{bail, Context, Result};
use rvplat_config::parse::{self, Severity};
use rvplat_config::{builtin_platforms, ConfigOverrides, PlatformConfig};

/// Resolve a preset name or file path and apply command-line overrides.
pub fn resolve(name_or_path: &str, overrides: &ConfigOverrides) -> Result<PlatformConfig> {
    let platform = parse::load_platform(name_or_path)
        .with_context(|| format!("loading platform '{name_or_path}'"))?;
    Ok(overrides.apply(platform))
}

/// List all built-in platforms.
pub fn list() -> Result<()> {
    println!("Built-in platforms:");
    println!();
    for (name, description) in builtin_platforms() {
        println!("  {name:<16} {description}");
    }
    println!();
    println!("Use 'rvplat platform describe <name>' for details.");
    Ok(())
}

/// Describe a platform in detail.
pub fn describe(
    name_or_path: &str,
    overrides: &ConfigOverrides,
    format: Option<&str>,
) -> Result<()> {
    let platform = resolve(name_or_path, overrides)?;

    match format {
        Some("toml") => {
            print!("{}", parse::platform_to_toml(&platform)?);
            return Ok(());
        }
        Some("json") => {
            println!("{}", serde_json::to_string_pretty(&platform)?);
            return Ok(());
        }
        Some(other) => bail!("unknown format '{other}' (expected toml or json)"),
        None => {}
    }

    println!("=== Platform: {} ===", platform.name());
    println!("Version: {}", platform.version());
    println!();

    println!("--- Features ---");
    println!("  Dirty-bit update:       {}", on_off(platform.enable_dirty_update()));
    println!("  Misaligned access:      {}", on_off(platform.enable_misaligned_access()));
    println!(
        "  mtval illegal insn bits: {}",
        on_off(platform.mtval_has_illegal_inst_bits())
    );
    println!();

    println!("--- Memory map ---");
    for region in platform.memory_regions() {
        println!(
            "  {:<6} 0x{:016X} - 0x{:016X} ({} bytes)",
            region.kind,
            region.base,
            region.end(),
            region.size,
        );
    }
    println!();

    println!("--- Host interface ---");
    println!("  tohost: 0x{:016X}", platform.htif_tohost());

    Ok(())
}

/// Print a template `.platform.toml`.
pub fn template(name: &str) -> Result<()> {
    print!("{}", parse::generate_template(name)?);
    Ok(())
}

/// Validate a platform and report every issue.
pub fn validate(name_or_path: &str, overrides: &ConfigOverrides) -> Result<()> {
    let platform = resolve(name_or_path, overrides)?;
    let issues = parse::lint_platform(&platform);
    for issue in &issues {
        println!("{}: {}", issue.severity, issue.message);
    }
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    if errors > 0 {
        bail!("platform '{}' has {errors} error(s)", platform.name());
    }
    println!("platform '{}' is valid", platform.name());
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_includes_builtins() {
        assert!(list().is_ok());
        assert!(builtin_platforms()
            .iter()
            .any(|(name, _)| *name == "rv64-default"));
    }

    #[test]
    fn describe_known_platform() {
        let none = ConfigOverrides::default();
        assert!(describe("rv64-default", &none, None).is_ok());
        assert!(describe("spike", &none, Some("toml")).is_ok());
        assert!(describe("spike", &none, Some("json")).is_ok());
        assert!(describe("spike", &none, Some("yaml")).is_err());
    }

    #[test]
    fn describe_upper_half_tohost_as_toml() {
        let overrides = ConfigOverrides {
            htif_tohost: Some(0x8000_0000_0000_1000),
            ..Default::default()
        };
        assert!(describe("rv64-default", &overrides, Some("toml")).is_ok());
        assert!(describe("rv64-default", &overrides, Some("json")).is_ok());
    }

    #[test]
    fn describe_unknown_platform() {
        assert!(describe("nonexistent", &ConfigOverrides::default(), None).is_err());
    }

    #[test]
    fn resolve_applies_overrides() {
        let overrides = ConfigOverrides {
            enable_misaligned_access: Some(true),
            ..Default::default()
        };
        let p = resolve("rv64-default", &overrides).unwrap();
        assert!(p.enable_misaligned_access());
    }

    #[test]
    fn validate_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.platform.toml");
        let bad = PlatformConfig::sail_default().with_rom(0x8000_0000, 0x1000);
        std::fs::write(&path, parse::platform_to_toml(&bad).unwrap()).unwrap();

        let name_or_path = path.to_str().unwrap();
        assert!(validate(name_or_path, &ConfigOverrides::default()).is_err());
        assert!(validate("spike", &ConfigOverrides::default()).is_ok());
    }

    #[test]
    fn template_prints() {
        assert!(template("board").is_ok());
    }
}
