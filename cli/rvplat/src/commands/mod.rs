//! CLI command implementations.

pub mod doctor;
pub mod platform;
pub mod replay;
