//! Titan: an educational state-vector quantum circuit simulator.
//!
//! The engine lives under [`core::titan`]; [`core::quantum_ir`] parses and runs circuit
//! scripts; the CLI and shell sit on top.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod io;
pub mod shell;

pub use crate::core::error::{QResult, QuantumError};
pub use crate::core::titan::session::Session;
pub use crate::core::titan::types::AmplitudeVector;
