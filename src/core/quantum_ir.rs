//! Titan circuit scripts: parsing and execution against a `Session`.
//!
//! Grammar (one instruction per line, keywords case-insensitive):
//!   CREATE <n> [name ...]
//!   GATE <kind> <targets> [controls] [angle]
//!   NOISE <kind> <prob> <targets>
//!   MEASURE <targets> [shots]
//!   METRICS
//! Lines may contain comments starting with `#` or `//`.
//! `<targets>`/`<controls>` are comma-separated indices or declared names.
//!
//! Examples:
//!   CREATE 2 a b
//!   GATE h a
//!   GATE cnot b a
//!   MEASURE a,b 1000

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::{fs, path::Path};

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use crate::core::error::QuantumError;
use crate::core::titan::circuit::{GateKind, GateSpec, NoiseKind, NoiseSpec};
use crate::core::titan::measurement::MeasurementResult;
use crate::core::titan::metrics::CircuitMetrics;
use crate::core::titan::noise::NoiseMode;
use crate::core::titan::optimizer::{CircuitOptimizer, OptimizationReport};
use crate::core::titan::session::Session;

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Create { num_qubits: usize, names: Vec<String> },
    Gate(GateSpec),
    Noise(NoiseSpec),
    /// `shots = None` collapses the state; otherwise samples without touching it.
    Measure { qubits: Vec<usize>, shots: Option<usize> },
    Metrics,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub instr: Instruction,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    /// Qubit count of the first CREATE, if any.
    pub fn num_qubits(&self) -> Option<usize> {
        self.statements.iter().find_map(|s| match &s.instr {
            Instruction::Create { num_qubits, .. } => Some(*num_qubits),
            _ => None,
        })
    }

    pub fn gates(&self) -> Vec<GateSpec> {
        self.statements
            .iter()
            .filter_map(|s| match &s.instr {
                Instruction::Gate(g) => Some(g.clone()),
                _ => None,
            })
            .collect()
    }

    /// Optimize each maximal run of consecutive GATE statements; anything else is a barrier.
    pub fn optimized(&self, optimizer: &CircuitOptimizer) -> (Program, OptimizationReport) {
        let mut out = Vec::with_capacity(self.statements.len());
        let mut total = OptimizationReport::default();
        let mut run: Vec<GateSpec> = Vec::new();
        let mut run_line = 0;

        let mut flush = |run: &mut Vec<GateSpec>, line: usize, out: &mut Vec<Statement>| {
            if run.is_empty() {
                return;
            }
            let (optimized, report) = optimizer.optimize_with_report(run);
            total.before += report.before;
            total.after += report.after;
            for (name, removed) in report.removed_by_rule {
                match total.removed_by_rule.iter_mut().find(|(n, _)| *n == name) {
                    Some(entry) => entry.1 += removed,
                    None => total.removed_by_rule.push((name, removed)),
                }
            }
            out.extend(optimized.into_iter().map(|g| Statement { line, instr: Instruction::Gate(g) }));
            run.clear();
        };

        for stmt in &self.statements {
            match &stmt.instr {
                Instruction::Gate(g) => {
                    if run.is_empty() {
                        run_line = stmt.line;
                    }
                    run.push(g.clone());
                }
                _ => {
                    flush(&mut run, run_line, &mut out);
                    out.push(stmt.clone());
                }
            }
        }
        flush(&mut run, run_line, &mut out);
        (Program { statements: out }, total)
    }
}

pub fn parse_file(path: &Path) -> Result<Program> {
    let src = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_program(&src).with_context(|| format!("in {}", path.display()))
}

pub fn parse_program(src: &str) -> Result<Program> {
    let mut names: BTreeMap<String, usize> = BTreeMap::new();
    let mut statements = Vec::new();
    for (lineno, raw) in src.lines().enumerate() {
        let instr = parse_line(raw, &names).with_context(|| format!("line {}", lineno + 1))?;
        if let Some(instr) = instr {
            if let Instruction::Create { names: declared, .. } = &instr {
                names = declared.iter().enumerate().map(|(i, n)| (n.clone(), i)).collect();
            }
            statements.push(Statement { line: lineno + 1, instr });
        }
    }
    Ok(Program { statements })
}

fn strip_comment(raw: &str) -> &str {
    let cut = [raw.find('#'), raw.find("//")].into_iter().flatten().min().unwrap_or(raw.len());
    raw[..cut].trim()
}

/// Parse one line; blank and comment-only lines give `None`.
pub fn parse_line(raw: &str, names: &BTreeMap<String, usize>) -> Result<Option<Instruction>> {
    let line = strip_comment(raw);
    if line.is_empty() {
        return Ok(None);
    }
    let toks: Vec<&str> = line.split_whitespace().collect();
    let kw = toks[0].to_ascii_lowercase();
    let args = &toks[1..];

    let instr = match kw.as_str() {
        "create" => {
            let Some(n) = args.first() else { bail!("usage: CREATE <n> [name ...]") };
            let num_qubits: usize = n.parse().map_err(|_| anyhow!("invalid qubit count '{n}'"))?;
            if num_qubits == 0 {
                bail!("CREATE needs at least one qubit");
            }
            let declared: Vec<String> = args[1..].iter().map(|s| s.to_string()).collect();
            if declared.len() > num_qubits {
                bail!("{} names for {} qubits", declared.len(), num_qubits);
            }
            if let Some(bad) = declared.iter().find(|n| n.parse::<usize>().is_ok()) {
                bail!("qubit name '{bad}' must not be numeric");
            }
            if let Some((i, dup)) = declared.iter().enumerate().find(|&(i, n)| declared[..i].contains(n)) {
                return Err(QuantumError::InvalidParameter(format!("qubit name '{dup}' repeated at position {i}")).into());
            }
            Instruction::Create { num_qubits, names: declared }
        }
        "gate" => Instruction::Gate(parse_gate(args, names)?),
        "noise" => {
            if args.len() != 3 {
                bail!("usage: NOISE <kind> <prob> <targets>");
            }
            let kind = noise_kind(args[0])?;
            let p: f64 = args[1].parse().map_err(|_| anyhow!("invalid probability '{}'", args[1]))?;
            Instruction::Noise(NoiseSpec::new(kind, p, qubit_list(args[2], names)?)?)
        }
        "measure" => {
            let shots = match args.len() {
                1 => None,
                2 => Some(parse_shots(args[1])?),
                _ => bail!("usage: MEASURE <targets> [shots]"),
            };
            Instruction::Measure { qubits: qubit_list(args[0], names)?, shots }
        }
        "metrics" => {
            if !args.is_empty() {
                bail!("METRICS takes no arguments");
            }
            Instruction::Metrics
        }
        other => bail!("unknown instruction '{other}'"),
    };
    Ok(Some(instr))
}

fn parse_gate(args: &[&str], names: &BTreeMap<String, usize>) -> Result<GateSpec> {
    let Some(name) = args.first() else { bail!("usage: GATE <kind> <targets> [controls] [angle]") };
    let name = name.to_ascii_lowercase();
    let mut rest: Vec<&str> = args[1..].to_vec();

    let mut angle = || -> Result<f64> {
        let tok = rest.pop().ok_or_else(|| anyhow!("{name} needs an angle"))?;
        parse_angle(tok).ok_or_else(|| anyhow!("invalid angle '{tok}'"))
    };
    let kind = match name.as_str() {
        "x" => GateKind::PauliX,
        "y" => GateKind::PauliY,
        "z" => GateKind::PauliZ,
        "h" => GateKind::Hadamard,
        "s" | "phase" => GateKind::Phase,
        "t" => GateKind::T,
        "rx" => GateKind::Rx(angle()?),
        "ry" => GateKind::Ry(angle()?),
        "rz" => GateKind::Rz(angle()?),
        "cnot" | "cx" => GateKind::Cnot,
        "cz" => GateKind::Cz,
        "swap" => GateKind::Swap,
        "toffoli" | "ccx" => GateKind::Toffoli,
        other => bail!("unknown gate '{other}'"),
    };

    let expected = if kind.num_controls() > 0 { 2 } else { 1 };
    if rest.len() != expected {
        bail!(
            "{} expects <targets>{}{}",
            kind.name(),
            if expected == 2 { " <controls>" } else { "" },
            if kind.angle().is_some() { " <angle>" } else { "" }
        );
    }
    let targets = qubit_list(rest[0], names)?;
    let controls = match rest.get(1) {
        Some(tok) => qubit_list(tok, names)?,
        None => Vec::new(),
    };
    Ok(GateSpec::new(kind, targets, controls)?)
}

/// Shot counts of zero or below are `EmptyShots`, like the sampler itself reports.
pub fn parse_shots(tok: &str) -> Result<usize> {
    let n: i64 = tok.parse().map_err(|_| anyhow!("invalid shot count '{tok}'"))?;
    if n <= 0 {
        return Err(QuantumError::EmptyShots.into());
    }
    usize::try_from(n).map_err(|_| anyhow!("shot count {n} is too large"))
}

fn noise_kind(name: &str) -> Result<NoiseKind> {
    Ok(match name.to_ascii_lowercase().as_str() {
        "depolarizing" | "depol" => NoiseKind::Depolarizing,
        "amplitude_damping" | "amp" => NoiseKind::AmplitudeDamping,
        "phase_damping" | "phase" => NoiseKind::PhaseDamping,
        other => bail!("unknown noise channel '{other}'"),
    })
}

fn qubit_list(tok: &str, names: &BTreeMap<String, usize>) -> Result<Vec<usize>> {
    tok.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| match names.get(s) {
            Some(&i) => Ok(i),
            None => s.parse::<usize>().map_err(|_| anyhow!("unknown qubit '{s}'")),
        })
        .collect::<Result<Vec<_>>>()
        .and_then(|v| if v.is_empty() { Err(anyhow!("empty qubit list")) } else { Ok(v) })
}

/// Floats or multiples of pi: `1.57`, `pi`, `-pi/2`, `3*pi/4`, `2pi`.
pub fn parse_angle(tok: &str) -> Option<f64> {
    if let Ok(v) = tok.parse::<f64>() {
        return v.is_finite().then_some(v);
    }
    let lower = tok.to_ascii_lowercase();
    let (sign, body) = match lower.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, lower.as_str()),
    };
    let (num, den) = match body.split_once('/') {
        Some((n, d)) => (n, d.parse::<f64>().ok()?),
        None => (body, 1.0),
    };
    if den == 0.0 {
        return None;
    }
    let coeff = match num.strip_suffix("pi")? {
        "" => 1.0,
        c => c.strip_suffix('*').unwrap_or(c).parse::<f64>().ok()?,
    };
    Some(sign * coeff * PI / den)
}

// ----- execution -----

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    Created { num_qubits: usize, names: Vec<String> },
    Gate { gate: String, targets: Vec<usize>, controls: Vec<usize> },
    Noise { channel: String, events: usize, mixed_purity: Option<f64> },
    Sampled(MeasurementResult),
    Collapsed { qubits: Vec<usize>, outcome: String },
    Metrics(CircuitMetrics),
}

#[derive(Clone, Debug)]
pub struct RunSettings {
    pub seed: Option<u64>,
    pub noise_mode: NoiseMode,
    pub max_qubits: usize,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self { seed: None, noise_mode: NoiseMode::Stochastic, max_qubits: 16 }
    }
}

/// Holds the current session (created by CREATE) and runs instructions against it.
pub struct Interpreter {
    settings: RunSettings,
    session: Option<Session>,
}

impl Interpreter {
    pub fn new(settings: RunSettings) -> Self {
        Self { settings, session: None }
    }

    pub fn session(&self) -> Option<&Session> { self.session.as_ref() }
    pub fn session_mut(&mut self) -> Option<&mut Session> { self.session.as_mut() }

    fn live(&mut self) -> Result<&mut Session> {
        self.session.as_mut().ok_or_else(|| anyhow!("no register yet: start with CREATE <n>"))
    }

    /// Parse one line against the current name table and run it.
    pub fn run_line(&mut self, line: &str) -> Result<Option<Event>> {
        let empty = BTreeMap::new();
        let names = self.session.as_ref().map(|s| s.names()).unwrap_or(&empty);
        match parse_line(line, names)? {
            Some(instr) => self.execute(&instr).map(Some),
            None => Ok(None),
        }
    }

    pub fn run_program(&mut self, program: &Program) -> Result<Vec<Event>> {
        program
            .statements
            .iter()
            .map(|s| self.execute(&s.instr).with_context(|| format!("line {}", s.line)))
            .collect()
    }

    pub fn execute(&mut self, instr: &Instruction) -> Result<Event> {
        Ok(match instr {
            Instruction::Create { num_qubits, names } => {
                if *num_qubits > self.settings.max_qubits {
                    bail!("{num_qubits} qubits exceeds the configured limit of {}", self.settings.max_qubits);
                }
                self.session = Some(Session::new(*num_qubits, names, self.settings.seed, self.settings.noise_mode)?);
                Event::Created { num_qubits: *num_qubits, names: names.clone() }
            }
            Instruction::Gate(g) => {
                self.live()?.apply_gate(g)?;
                Event::Gate { gate: g.kind().name().to_string(), targets: g.targets().to_vec(), controls: g.controls().to_vec() }
            }
            Instruction::Noise(n) => {
                let outcome = self.live()?.apply_noise(n)?;
                Event::Noise { channel: n.kind().name().to_string(), events: outcome.events, mixed_purity: outcome.mixed_purity }
            }
            Instruction::Measure { qubits, shots: Some(shots) } => Event::Sampled(self.live()?.sample(qubits, *shots)?),
            Instruction::Measure { qubits, shots: None } => {
                let outcome = self.live()?.collapse(qubits)?;
                Event::Collapsed { qubits: qubits.clone(), outcome }
            }
            Instruction::Metrics => Event::Metrics(self.live()?.metrics()?),
        })
    }
}
