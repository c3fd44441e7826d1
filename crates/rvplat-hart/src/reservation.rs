//! Load-reserved/store-conditional reservation slot.
//!
//! A hart holds at most one reservation. `acquire` records an address
//! (silently replacing any previous one), `matches` asks whether a conditional
//! store to an address may commit, and `release` drops the reservation.
//!
//! `matches` never changes state. Releasing after a conditional store, or on
//! a trap, is the caller's decision; see [`crate::HartContext::store_conditional`]
//! for the policy used by this crate's own helpers.

use rvplat_config::MachWord;

/// Observable state of a [`Reservation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReservationState {
    /// No reservation held.
    Empty,
    /// A reservation on the given address.
    Held(MachWord),
}

/// The single reservation slot of one hart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reservation {
    held: Option<MachWord>,
}

impl Reservation {
    /// Create an empty reservation.
    pub const fn new() -> Self {
        Self { held: None }
    }

    /// Reserve `addr`, replacing any reservation already held.
    pub fn acquire(&mut self, addr: MachWord) {
        if let Some(prev) = self.held.replace(addr) {
            tracing::trace!(target: "rvplat::reservation", prev, addr, "reservation replaced");
        } else {
            tracing::trace!(target: "rvplat::reservation", addr, "reservation acquired");
        }
    }

    /// Whether a conditional store may proceed to the address check.
    ///
    /// Always `true`: conditions such as an intervening trap or mode switch
    /// are evaluated by the caller.
    pub fn is_eligible(&self) -> bool {
        true
    }

    /// Whether a reservation is held on exactly `addr`.
    pub fn matches(&self, addr: MachWord) -> bool {
        let hit = self.held == Some(addr);
        tracing::trace!(target: "rvplat::reservation", addr, held = ?self.held, hit, "reservation checked");
        hit
    }

    /// Drop the reservation. No-op when nothing is held.
    pub fn release(&mut self) {
        if self.held.take().is_some() {
            tracing::trace!(target: "rvplat::reservation", "reservation released");
        }
    }

    /// The reserved address, if any.
    pub fn address(&self) -> Option<MachWord> {
        self.held
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn state(&self) -> ReservationState {
        match self.held {
            Some(addr) => ReservationState::Held(addr),
            None => ReservationState::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reservation_matches_nothing() {
        let r = Reservation::new();
        assert!(!r.matches(0x2000));
        assert!(!r.matches(0));
        assert_eq!(r.state(), ReservationState::Empty);
        assert_eq!(r, Reservation::default());
    }

    #[test]
    fn acquire_then_match() {
        let mut r = Reservation::new();
        r.acquire(0x1000);
        assert!(r.matches(0x1000));
        assert!(!r.matches(0x1004));
        assert_eq!(r.state(), ReservationState::Held(0x1000));
    }

    #[test]
    fn release_clears() {
        let mut r = Reservation::new();
        r.acquire(0x1000);
        r.release();
        assert!(!r.matches(0x1000));
        assert!(!r.is_held());
        assert_eq!(r.address(), None);
    }

    #[test]
    fn acquire_overwrites_instead_of_merging() {
        let mut r = Reservation::new();
        r.acquire(0x1000);
        r.acquire(0x2000);
        assert!(!r.matches(0x1000));
        assert!(r.matches(0x2000));
        assert_eq!(r.address(), Some(0x2000));
    }

    #[test]
    fn release_when_empty_is_noop() {
        let mut r = Reservation::new();
        r.release();
        r.release();
        assert_eq!(r.state(), ReservationState::Empty);
        assert!(!r.matches(0));
    }

    #[test]
    fn match_does_not_consume() {
        let mut r = Reservation::new();
        r.acquire(0x8000_0040);
        assert!(r.matches(0x8000_0040));
        assert!(r.matches(0x8000_0040));
        assert!(r.is_held());
    }

    #[test]
    fn always_eligible() {
        let mut r = Reservation::new();
        assert!(r.is_eligible());
        r.acquire(0x10);
        assert!(r.is_eligible());
        r.release();
        assert!(r.is_eligible());
    }

    #[test]
    fn address_zero_is_a_real_reservation() {
        let mut r = Reservation::new();
        r.acquire(0);
        assert!(r.matches(0));
        assert!(!r.matches(u64::MAX));
    }
}
