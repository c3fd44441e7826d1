//! Per-hart platform boundary for the rvplat emulator.
//!
//! The instruction-execution engine calls into this crate for:
//! - **Reservations:** the LR/SC exclusive-access slot ([`Reservation`])
//! - **Console output:** a byte sink fed by `term_write` ([`ConsoleSink`])
//! - **Hooks:** instructions-per-tick and memory-extension extension points
//! - **Configuration:** read-only access to the [`PlatformConfig`] snapshot
//!
//! All of it is reached through a [`HartContext`], one per hart. Every
//! operation is synchronous and infallible.

pub mod console;
pub mod context;
pub mod hart_set;
pub mod hooks;
pub mod reservation;

pub use console::{BufferConsole, ConsoleSink, NullConsole, StdoutConsole};
pub use context::{HartContext, HartId, ScOutcome};
pub use hart_set::HartSet;
pub use reservation::{Reservation, ReservationState};
pub use rvplat_config::{MachWord, PlatformConfig};
