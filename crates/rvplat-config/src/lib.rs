//! Platform configuration for the rvplat emulator boundary.
//!
//! The execution engine reads a single immutable [`PlatformConfig`] snapshot:
//! - **Feature flags:** dirty-bit update, misaligned access, illegal
//!   instruction bits in `mtval`
//! - **Memory map:** RAM, ROM, and CLINT base/size pairs
//! - **Host interface:** the HTIF `tohost` address
//!
//! The snapshot is built once (from a preset, a `.platform.toml` file, and
//! command-line overrides) before the first instruction executes.

pub mod error;
pub mod overrides;
pub mod parse;
pub mod platform;
pub mod region;
mod word;

pub use error::{ConfigError, Result};
pub use overrides::ConfigOverrides;
pub use platform::{builtin_platforms, resolve_platform, PlatformConfig};
pub use region::{MemoryRegion, RegionKind};

/// A machine word as seen by the execution engine.
pub type MachWord = u64;
