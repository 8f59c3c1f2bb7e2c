//! Core module tree for the Titan simulator.

#[macro_use]
pub mod debug; // gated debug logging (TITAN_DEBUG=1) provides debug_log! macro
pub mod error;
pub mod quantum_extract;
pub mod quantum_ir;
pub mod titan;
