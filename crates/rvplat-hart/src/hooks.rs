//! Forward-compatibility hooks with no behavior yet.

use rvplat_config::MachWord;

/// Instructions to execute between timer/interrupt checks.
///
/// `None` means unbounded: the engine picks its own cadence.
pub fn insns_per_tick() -> Option<u64> {
    None
}

/// Notification that the guest's memory has been extended by `len` bytes.
///
/// Accepted and ignored.
pub fn notify_memory_extension(len: MachWord, tag: i64) {
    tracing::trace!(len, tag, "memory extension ignored");
}
