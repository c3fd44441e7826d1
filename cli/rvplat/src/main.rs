//! rvplat CLI: inspect emulator platform configurations and replay LR/SC traces.

mod commands;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rvplat_config::ConfigOverrides;
use rvplat_hart::StdoutConsole;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rvplat", version, about = "RISC-V emulator platform boundary tools")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage platform configurations
    Platform {
        #[command(subcommand)]
        action: PlatformAction,
    },
    /// Replay an LR/SC trace script against the platform boundary
    Replay {
        /// Script file
        script: PathBuf,
        /// Platform preset name or .platform.toml path
        #[arg(long, default_value = "rv64-default")]
        platform: String,
        /// Number of harts
        #[arg(long, default_value_t = 1)]
        harts: usize,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Check presets and platform files in the current directory
    Doctor,
}

#[derive(Subcommand)]
enum PlatformAction {
    /// List built-in platforms
    List,
    /// Show details of a platform
    Describe {
        /// Platform preset name or .platform.toml path
        name: String,
        /// Output format (default: human-readable, "toml" or "json")
        #[arg(long)]
        format: Option<String>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
    /// Print a template platform definition
    Template {
        /// Platform name
        name: String,
    },
    /// Validate a platform definition
    Validate {
        /// Platform preset name or .platform.toml path
        name: String,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

/// Per-run configuration overrides.
#[derive(Args, Debug, Default)]
struct OverrideArgs {
    /// Enable hardware updates of PTE dirty/accessed bits
    #[arg(long)]
    enable_dirty_update: bool,
    /// Enable misaligned loads and stores
    #[arg(long)]
    enable_misaligned: bool,
    /// Write illegal instruction bits to mtval
    #[arg(long)]
    mtval_has_illegal_inst_bits: bool,
    /// RAM size in bytes (decimal or 0x-prefixed hex)
    #[arg(long, value_parser = parse_size)]
    ram_size: Option<u64>,
    /// Address of the HTIF tohost word
    #[arg(long, value_parser = parse_size)]
    tohost: Option<u64>,
}

impl OverrideArgs {
    fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            enable_dirty_update: self.enable_dirty_update.then_some(true),
            enable_misaligned_access: self.enable_misaligned.then_some(true),
            mtval_has_illegal_inst_bits: self.mtval_has_illegal_inst_bits.then_some(true),
            ram_size: self.ram_size,
            htif_tohost: self.tohost,
        }
    }
}

fn parse_size(s: &str) -> Result<u64, String> {
    let cleaned = s.replace('_', "");
    let parsed = match cleaned.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => cleaned.parse(),
    };
    parsed.map_err(|e| format!("invalid number '{s}': {e}"))
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Platform { action } => match action {
            PlatformAction::List => commands::platform::list(),
            PlatformAction::Describe {
                name,
                format,
                overrides,
            } => commands::platform::describe(&name, &overrides.to_overrides(), format.as_deref()),
            PlatformAction::Template { name } => commands::platform::template(&name),
            PlatformAction::Validate { name, overrides } => {
                commands::platform::validate(&name, &overrides.to_overrides())
            }
        },

        Commands::Replay {
            script,
            platform,
            harts,
            overrides,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("reading {}", script.display()))?;
            let config = commands::platform::resolve(&platform, &overrides.to_overrides())?;
            let mut stdout = std::io::stdout();
            commands::replay::run(&text, config, harts, |_| StdoutConsole, &mut stdout)?;
            Ok(())
        }

        Commands::Doctor => {
            let cwd = std::env::current_dir()?;
            commands::doctor::run(&cwd)
        }
    }
}
