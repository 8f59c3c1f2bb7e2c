use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::titan::noise::NoiseMode;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum NoiseModeArg {
    Stochastic,
    Density,
}

impl From<NoiseModeArg> for NoiseMode {
    fn from(m: NoiseModeArg) -> Self {
        match m {
            NoiseModeArg::Stochastic => NoiseMode::Stochastic,
            NoiseModeArg::Density => NoiseMode::Density,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum, Default)]
pub enum ExportKind {
    /// Assembly-like gate listing
    #[default]
    Listing,
    /// Gate records as JSON
    Json,
    /// Final state snapshot as JSON
    State,
}

#[derive(Debug, Parser)]
#[command(
    name = "titan",
    about = "Titan — educational state-vector quantum circuit simulator",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct TitanCli {
    /// Global: path to config (TOML); default: ~/.titan/config.toml
    #[arg(long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Global: RNG seed for reproducible noise and measurement
    #[arg(long = "seed", value_name = "N", global = true)]
    pub seed: Option<u64>,

    /// Global: log engine steps to stderr (same as TITAN_DEBUG=1)
    #[arg(long = "debug", action = ArgAction::SetTrue, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute a circuit script
    ///
    /// Examples:
    ///   titan run bell.tq --seed 7
    ///   titan run noisy.tq --noise-mode density --json
    Run {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        /// After the script, sample every qubit of the final state N times
        #[arg(long = "shots", value_name = "N")]
        shots: Option<usize>,
        /// Rewrite gate runs with the circuit optimizer first
        #[arg(long = "optimize", action = ArgAction::SetTrue)]
        optimize: bool,
        #[arg(long = "noise-mode", value_enum, value_name = "MODE")]
        noise_mode: Option<NoiseModeArg>,
        /// Emit one JSON event per line instead of text
        #[arg(long = "json", action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Show the gate listing before and after optimization
    Optimize {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },

    /// Export a script's circuit or final state
    Export {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
        #[arg(long = "format", value_enum, default_value_t = ExportKind::Listing)]
        format: ExportKind,
        /// Output file (stdout when omitted)
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
        #[arg(long = "optimize", action = ArgAction::SetTrue)]
        optimize: bool,
    },

    /// Interactive session shell (default when no subcommand is given)
    Shell,
}
