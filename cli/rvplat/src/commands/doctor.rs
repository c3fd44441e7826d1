//! `rvplat doctor`: environment diagnostics.

use std::path::Path;

use anyhow::Result;
use rvplat_config::builtin_platforms;
use rvplat_config::parse::{discover_platforms, load_platform_toml, validate_platform};

/// Print version, preset, and platform-file status for `project_dir`.
pub fn run(project_dir: &Path) -> Result<()> {
    println!("=== rvplat doctor ===");
    println!();

    println!("rvplat version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("--- Built-in platforms ---");
    for (name, _) in builtin_platforms() {
        println!("  {name}");
    }
    println!();

    println!("--- Platform files ({}) ---", project_dir.join("platforms").display());
    let found = discover_platforms(project_dir)?;
    if found.is_empty() {
        println!("  none found");
    }
    for (name, path) in found {
        let status = match load_platform_toml(&path) {
            Ok(platform) => match validate_platform(&platform) {
                Ok(()) => "ok".to_string(),
                Err(issues) => format!("{} issue(s)", issues.len()),
            },
            Err(e) => format!("error: {e}"),
        };
        println!("  {name:<16} {status}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rvplat_config::parse::generate_template;

    #[test]
    fn doctor_runs_without_platforms() {
        let dir = tempfile::tempdir().unwrap();
        super::run(dir.path()).unwrap();
    }

    #[test]
    fn doctor_reports_broken_files() {
        let dir = tempfile::tempdir().unwrap();
        let platforms = dir.path().join("platforms");
        std::fs::create_dir_all(&platforms).unwrap();
        std::fs::write(platforms.join("good.platform.toml"), generate_template("good").unwrap())
            .unwrap();
        std::fs::write(platforms.join("bad.platform.toml"), "not toml [[[").unwrap();
        super::run(dir.path()).unwrap();
    }
}
