//! The per-hart execution context handed to instruction handlers.
//!
//! A [`HartContext`] owns one hart's reservation and console and shares the
//! platform configuration with every other hart. Handlers receive it by
//! reference; there is no process-wide reservation.

use std::fmt;
use std::sync::Arc;

use rvplat_config::{MachWord, PlatformConfig};

use crate::console::{ConsoleSink, StdoutConsole};
use crate::hooks;
use crate::reservation::Reservation;

/// Hardware thread identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HartId(pub usize);

impl fmt::Display for HartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hart{}", self.0)
    }
}

/// Result of a store-conditional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScOutcome {
    /// The store committed.
    Success,
    /// The store was suppressed.
    Failure,
}

impl ScOutcome {
    /// Value written to `rd`: 0 on success, 1 on failure.
    pub fn rd_value(self) -> MachWord {
        match self {
            ScOutcome::Success => 0,
            ScOutcome::Failure => 1,
        }
    }

    pub fn is_success(self) -> bool {
        self == ScOutcome::Success
    }
}

/// Platform state owned by a single hart.
pub struct HartContext<C: ConsoleSink = StdoutConsole> {
    id: HartId,
    config: Arc<PlatformConfig>,
    reservation: Reservation,
    console: C,
}

impl<C: ConsoleSink> HartContext<C> {
    /// Create a context with an empty reservation.
    pub fn new(id: HartId, config: Arc<PlatformConfig>, console: C) -> Self {
        Self {
            id,
            config,
            reservation: Reservation::new(),
            console,
        }
    }

    pub fn id(&self) -> HartId {
        self.id
    }

    /// The shared configuration snapshot.
    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// A new handle to the shared configuration.
    pub fn shared_config(&self) -> Arc<PlatformConfig> {
        Arc::clone(&self.config)
    }

    pub fn reservation(&self) -> &Reservation {
        &self.reservation
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    // --- Reservation boundary ---

    /// LR: reserve `addr`.
    pub fn load_reservation(&mut self, addr: MachWord) {
        tracing::trace!(hart = self.id.0, addr, "load reservation");
        self.reservation.acquire(addr);
    }

    /// Whether a conditional store may proceed to the address check.
    pub fn speculate_conditional(&self) -> bool {
        self.reservation.is_eligible()
    }

    /// Whether the reservation authorizes a conditional store to `addr`.
    pub fn match_reservation(&self, addr: MachWord) -> bool {
        self.reservation.matches(addr)
    }

    /// Drop any held reservation.
    pub fn cancel_reservation(&mut self) {
        tracing::trace!(hart = self.id.0, "cancel reservation");
        self.reservation.release();
    }

    /// SC: decide whether a conditional store to `addr` commits.
    ///
    /// Every store-conditional releases the reservation, whether it succeeds
    /// or not, so a later SC cannot pair with the same LR.
    pub fn store_conditional(&mut self, addr: MachWord) -> ScOutcome {
        let outcome = if self.speculate_conditional() && self.match_reservation(addr) {
            ScOutcome::Success
        } else {
            ScOutcome::Failure
        };
        self.cancel_reservation();
        tracing::trace!(hart = self.id.0, addr, ?outcome, "store conditional");
        outcome
    }

    /// A trap was taken on this hart; the reservation does not survive it.
    pub fn on_trap(&mut self) {
        self.cancel_reservation();
    }

    // --- Console and hooks ---

    /// Forward the low byte of `word` to the console.
    pub fn term_write(&mut self, word: MachWord) {
        self.console.write_byte((word & 0xff) as u8);
    }

    /// See [`hooks::insns_per_tick`].
    pub fn insns_per_tick(&self) -> Option<u64> {
        hooks::insns_per_tick()
    }

    /// See [`hooks::notify_memory_extension`].
    pub fn notify_memory_extension(&self, len: MachWord, tag: i64) {
        hooks::notify_memory_extension(len, tag);
    }
}

impl<C: ConsoleSink + fmt::Debug> fmt::Debug for HartContext<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HartContext")
            .field("id", &self.id)
            .field("platform", &self.config.name())
            .field("reservation", &self.reservation)
            .field("console", &self.console)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::BufferConsole;
    use crate::reservation::ReservationState;

    fn ctx() -> HartContext<BufferConsole> {
        HartContext::new(
            HartId(0),
            Arc::new(PlatformConfig::sail_default()),
            BufferConsole::new(),
        )
    }

    #[test]
    fn sc_succeeds_once_per_lr() {
        let mut c = ctx();
        c.load_reservation(0x8000_0100);
        assert_eq!(c.store_conditional(0x8000_0100), ScOutcome::Success);
        assert_eq!(c.store_conditional(0x8000_0100), ScOutcome::Failure);
    }

    #[test]
    fn failed_sc_still_releases() {
        let mut c = ctx();
        c.load_reservation(0x8000_0100);
        assert_eq!(c.store_conditional(0x8000_0108), ScOutcome::Failure);
        assert_eq!(c.reservation().state(), ReservationState::Empty);
        assert_eq!(c.store_conditional(0x8000_0100), ScOutcome::Failure);
    }

    #[test]
    fn sc_without_lr_fails() {
        let mut c = ctx();
        let outcome = c.store_conditional(0x8000_0000);
        assert_eq!(outcome, ScOutcome::Failure);
        assert_eq!(outcome.rd_value(), 1);
        assert!(!outcome.is_success());
        assert_eq!(ScOutcome::Success.rd_value(), 0);
    }

    #[test]
    fn raw_match_is_side_effect_free() {
        let mut c = ctx();
        c.load_reservation(0x40);
        assert!(c.speculate_conditional());
        assert!(c.match_reservation(0x40));
        assert!(c.match_reservation(0x40));
        c.cancel_reservation();
        assert!(!c.match_reservation(0x40));
    }

    #[test]
    fn trap_cancels_reservation() {
        let mut c = ctx();
        c.load_reservation(0x40);
        c.on_trap();
        assert_eq!(c.store_conditional(0x40), ScOutcome::Failure);
    }

    #[test]
    fn term_write_keeps_low_byte() {
        let mut c = ctx();
        c.term_write(0x141);
        c.term_write(0xFFFF_FF0A);
        assert_eq!(c.console().bytes(), b"A\n");
        c.console_mut().take();
        assert!(c.console().bytes().is_empty());
    }

    #[test]
    fn hooks_are_inert() {
        let c = ctx();
        assert_eq!(c.insns_per_tick(), None);
        c.notify_memory_extension(0x1000, 3);
        assert_eq!(c.reservation().state(), ReservationState::Empty);
    }

    #[test]
    fn config_is_shared_not_copied() {
        let c = ctx();
        let shared = c.shared_config();
        assert!(std::ptr::eq(c.config(), shared.as_ref()));
        assert_eq!(c.config().ram_base(), 0x8000_0000);
        assert_eq!(c.id().to_string(), "hart0");
    }
}
