//! Titan main: subcommands, with the interactive shell by default.

use clap::Parser; // trait import enables TitanCli::parse()

use titan_qsim::cli::{Command, TitanCli};
use titan_qsim::commands::quantum::{quantum_export, quantum_optimize, quantum_run, RunOptions};
use titan_qsim::config::SimConfig;
use titan_qsim::core::debug;
use titan_qsim::shell;

fn main() -> anyhow::Result<()> {
    let args = TitanCli::parse();

    if args.debug {
        debug::force_enable();
    }

    let mut cfg = SimConfig::resolve(&args.config)?;
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    match args.cmd {
        None | Some(Command::Shell) => shell::start(cfg),
        Some(Command::Run { script, shots, optimize, noise_mode, json }) => {
            if let Some(mode) = noise_mode {
                cfg.noise_mode = mode.into();
            }
            quantum_run(&script, &cfg, &RunOptions { shots, optimize, json })
        }
        Some(Command::Optimize { script }) => quantum_optimize(&script),
        Some(Command::Export { script, format, out, optimize }) => quantum_export(&script, format, out, optimize, &cfg),
    }
}
