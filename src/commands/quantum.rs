//! CLI entry points for circuit scripts.
//!
//! Examples:
//!   titan run demos/bell.tq --seed 7
//!   titan optimize demos/cancel.tq
//!   titan export demos/bell.tq --format state -o bell.json

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use colored::Colorize;

use crate::cli::ExportKind;
use crate::config::SimConfig;
use crate::core::quantum_extract::{circuit_to_json, circuit_to_listing};
use crate::core::quantum_ir::{parse_file, Event, Interpreter, Program};
use crate::core::titan::optimizer::{CircuitOptimizer, OptimizationReport};
use crate::io::atomic::atomic_write;

#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub shots: Option<usize>,
    pub optimize: bool,
    pub json: bool,
}

fn load_program(script: &Path, optimize: bool, quiet: bool) -> Result<Program> {
    let program = parse_file(script)?;
    if !optimize {
        return Ok(program);
    }
    let (optimized, report) = program.optimized(&CircuitOptimizer::new());
    if !quiet {
        eprintln!("{}", summary_line(&report).dimmed());
    }
    Ok(optimized)
}

fn summary_line(report: &OptimizationReport) -> String {
    let rules: Vec<String> = report.removed_by_rule.iter().map(|(n, k)| format!("{n} -{k}")).collect();
    format!("optimizer: {} -> {} gates ({})", report.before, report.after, rules.join(", "))
}

/// Run every statement of `script`, printing events as they happen.
pub fn quantum_run(script: &Path, cfg: &SimConfig, opts: &RunOptions) -> Result<()> {
    let program = load_program(script, cfg.optimize || opts.optimize, opts.json)?;
    let mut interp = Interpreter::new(cfg.run_settings());
    for stmt in &program.statements {
        let event = interp
            .execute(&stmt.instr)
            .with_context(|| format!("{}:{}", script.display(), stmt.line))?;
        emit(&event, opts.json)?;
    }
    if let Some(shots) = opts.shots {
        let session = interp
            .session_mut()
            .ok_or_else(|| anyhow!("{}: script never creates a register", script.display()))?;
        let all: Vec<usize> = (0..session.num_qubits()).collect();
        let result = session.sample(&all, shots).context("final readout")?;
        emit(&Event::Sampled(result), opts.json)?;
    }
    Ok(())
}

pub fn emit(event: &Event, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(event).context("serializing event")?);
    } else if let Some(text) = render_event(event) {
        println!("{text}");
    }
    Ok(())
}

/// Human-readable form of an event; gates are silent (see `--debug`).
pub fn render_event(event: &Event) -> Option<String> {
    Some(match event {
        Event::Created { num_qubits, names } => {
            let mut s = format!("{} {} qubit(s)", "register:".bold(), num_qubits);
            if !names.is_empty() {
                let labels: Vec<String> = names.iter().enumerate().map(|(i, n)| format!("{n}={i}")).collect();
                s.push_str(&format!(" ({})", labels.join(", ")));
            }
            s
        }
        Event::Gate { .. } => return None,
        Event::Noise { channel, events, mixed_purity } => match mixed_purity {
            Some(p) => format!("{} {channel}: mixed purity {p:.6}", "noise".yellow()),
            None => format!("{} {channel}: {events} event(s)", "noise".yellow()),
        },
        Event::Sampled(r) => {
            let mut s = format!(
                "{} {:?} x {} shots -> {}",
                "measure".cyan().bold(),
                r.qubits,
                r.shots,
                r.outcome.bold()
            );
            for (outcome, count) in &r.histogram {
                s.push_str(&format!("\n  {outcome}  {count:>8}  {:.4}", *count as f64 / r.shots as f64));
            }
            s
        }
        Event::Collapsed { qubits, outcome } => format!("{} {:?} -> {}", "measure".cyan().bold(), qubits, outcome.bold()),
        Event::Metrics(m) => {
            let fidelity = m.fidelity.map(|f| format!("{f:.6}")).unwrap_or_else(|| "-".into());
            format!(
                "{} purity {:.6}  coherence {:.6}  fidelity {}  entanglement~ {:.6}",
                "metrics".green().bold(),
                m.purity,
                m.coherence,
                fidelity,
                m.entanglement_proxy
            )
        }
    })
}

/// Print the gate listing before and after optimization.
pub fn quantum_optimize(script: &Path) -> Result<()> {
    let program = parse_file(script)?;
    let n = register_size(&program);
    let (optimized, report) = program.optimized(&CircuitOptimizer::new());
    println!("{}", "// before".dimmed());
    print!("{}", circuit_to_listing(n, &program.gates()));
    println!("{}", "// after".dimmed());
    print!("{}", circuit_to_listing(n, &optimized.gates()));
    println!("{}", summary_line(&report));
    Ok(())
}

fn register_size(program: &Program) -> usize {
    program
        .num_qubits()
        .unwrap_or_else(|| program.gates().iter().map(|g| g.max_qubit() + 1).max().unwrap_or(1))
}

pub fn quantum_export(script: &Path, kind: ExportKind, out: Option<PathBuf>, optimize: bool, cfg: &SimConfig) -> Result<()> {
    let program = load_program(script, cfg.optimize || optimize, true)?;
    let mut text = match kind {
        ExportKind::Listing => circuit_to_listing(register_size(&program), &program.gates()),
        ExportKind::Json => circuit_to_json(register_size(&program), &program.gates())?,
        ExportKind::State => {
            let mut interp = Interpreter::new(cfg.run_settings());
            interp.run_program(&program).with_context(|| format!("running {}", script.display()))?;
            let session = interp
                .session()
                .ok_or_else(|| anyhow!("{}: script never creates a register", script.display()))?;
            session.snapshot().to_json()?
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    match out {
        Some(path) => {
            atomic_write(&path, &text).with_context(|| format!("writing {}", path.display()))?;
            println!("{} {}", "wrote".green(), path.display());
        }
        None => print!("{text}"),
    }
    Ok(())
}
