//! Symbolic operation records: gates and noise channels addressed by qubit index.
//!
//! Records are validated on construction and never change afterwards; rewriting passes build
//! new records instead of editing existing ones.
use crate::core::error::{QResult, QuantumError};
use crate::core::titan::types::Unitary;

#[derive(Clone, Debug, PartialEq)]
pub enum GateKind {
    PauliX,
    PauliY,
    PauliZ,
    Hadamard,
    /// S gate, diag(1, i).
    Phase,
    T,
    Rx(f64),
    Ry(f64),
    Rz(f64),
    Cnot,
    Cz,
    Swap,
    Toffoli,
    Custom(Unitary),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl GateKind {
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::PauliX => "x",
            GateKind::PauliY => "y",
            GateKind::PauliZ => "z",
            GateKind::Hadamard => "h",
            GateKind::Phase => "s",
            GateKind::T => "t",
            GateKind::Rx(_) => "rx",
            GateKind::Ry(_) => "ry",
            GateKind::Rz(_) => "rz",
            GateKind::Cnot => "cx",
            GateKind::Cz => "cz",
            GateKind::Swap => "swap",
            GateKind::Toffoli => "ccx",
            GateKind::Custom(_) => "unitary",
        }
    }

    pub fn num_targets(&self) -> usize {
        match self {
            GateKind::Swap => 2,
            GateKind::Custom(u) => u.arity(),
            _ => 1,
        }
    }

    pub fn num_controls(&self) -> usize {
        match self {
            GateKind::Cnot | GateKind::Cz => 1,
            GateKind::Toffoli => 2,
            _ => 0,
        }
    }

    pub fn angle(&self) -> Option<f64> {
        match self {
            GateKind::Rx(a) | GateKind::Ry(a) | GateKind::Rz(a) => Some(*a),
            _ => None,
        }
    }

    pub fn rotation(&self) -> Option<(Axis, f64)> {
        match self {
            GateKind::Rx(a) => Some((Axis::X, *a)),
            GateKind::Ry(a) => Some((Axis::Y, *a)),
            GateKind::Rz(a) => Some((Axis::Z, *a)),
            _ => None,
        }
    }

    /// Uncontrolled one-qubit gates that square to the identity.
    pub fn is_self_inverse(&self) -> bool {
        matches!(self, GateKind::Hadamard | GateKind::PauliX | GateKind::PauliY | GateKind::PauliZ)
    }

    pub fn rotation_about(axis: Axis, angle: f64) -> GateKind {
        match axis {
            Axis::X => GateKind::Rx(angle),
            Axis::Y => GateKind::Ry(angle),
            Axis::Z => GateKind::Rz(angle),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GateSpec {
    kind: GateKind,
    targets: Vec<usize>,
    controls: Vec<usize>,
}

impl GateSpec {
    pub fn new(kind: GateKind, targets: Vec<usize>, controls: Vec<usize>) -> QResult<Self> {
        if targets.len() != kind.num_targets() || controls.len() != kind.num_controls() {
            return Err(QuantumError::InvalidParameter(format!(
                "{} takes {} target(s) and {} control(s), got {} and {}",
                kind.name(),
                kind.num_targets(),
                kind.num_controls(),
                targets.len(),
                controls.len()
            )));
        }
        if let Some(a) = kind.angle() {
            if !a.is_finite() {
                return Err(QuantumError::InvalidParameter(format!("{} angle must be finite", kind.name())));
            }
        }
        let mut all: Vec<usize> = targets.iter().chain(controls.iter()).copied().collect();
        all.sort_unstable();
        all.dedup();
        if all.len() != targets.len() + controls.len() {
            return Err(QuantumError::InvalidParameter(format!(
                "{} qubits must be distinct (targets {:?}, controls {:?})",
                kind.name(),
                targets,
                controls
            )));
        }
        Ok(Self { kind, targets, controls })
    }

    fn single(kind: GateKind, q: usize) -> Self {
        Self { kind, targets: vec![q], controls: Vec::new() }
    }

    pub fn x(q: usize) -> Self { Self::single(GateKind::PauliX, q) }
    pub fn y(q: usize) -> Self { Self::single(GateKind::PauliY, q) }
    pub fn z(q: usize) -> Self { Self::single(GateKind::PauliZ, q) }
    pub fn h(q: usize) -> Self { Self::single(GateKind::Hadamard, q) }
    pub fn s(q: usize) -> Self { Self::single(GateKind::Phase, q) }
    pub fn t(q: usize) -> Self { Self::single(GateKind::T, q) }
    pub fn rx(q: usize, theta: f64) -> QResult<Self> { Self::new(GateKind::Rx(theta), vec![q], vec![]) }
    pub fn ry(q: usize, theta: f64) -> QResult<Self> { Self::new(GateKind::Ry(theta), vec![q], vec![]) }
    pub fn rz(q: usize, theta: f64) -> QResult<Self> { Self::new(GateKind::Rz(theta), vec![q], vec![]) }

    pub fn cnot(control: usize, target: usize) -> QResult<Self> {
        Self::new(GateKind::Cnot, vec![target], vec![control])
    }
    pub fn cz(control: usize, target: usize) -> QResult<Self> {
        Self::new(GateKind::Cz, vec![target], vec![control])
    }
    pub fn swap(a: usize, b: usize) -> QResult<Self> {
        Self::new(GateKind::Swap, vec![a, b], vec![])
    }
    pub fn toffoli(c1: usize, c2: usize, target: usize) -> QResult<Self> {
        Self::new(GateKind::Toffoli, vec![target], vec![c1, c2])
    }
    pub fn custom(u: Unitary, targets: Vec<usize>) -> QResult<Self> {
        Self::new(GateKind::Custom(u), targets, vec![])
    }

    pub fn kind(&self) -> &GateKind { &self.kind }
    pub fn targets(&self) -> &[usize] { &self.targets }
    pub fn controls(&self) -> &[usize] { &self.controls }

    /// Largest qubit index touched.
    pub fn max_qubit(&self) -> usize {
        self.targets.iter().chain(self.controls.iter()).copied().max().unwrap_or(0)
    }

    /// The single target of an uncontrolled one-qubit gate.
    pub fn sole_target(&self) -> Option<usize> {
        match (self.targets.as_slice(), self.controls.is_empty()) {
            ([t], true) => Some(*t),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoiseKind {
    Depolarizing,
    AmplitudeDamping,
    PhaseDamping,
}

impl NoiseKind {
    pub fn name(&self) -> &'static str {
        match self {
            NoiseKind::Depolarizing => "depolarizing",
            NoiseKind::AmplitudeDamping => "amplitude_damping",
            NoiseKind::PhaseDamping => "phase_damping",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NoiseSpec {
    kind: NoiseKind,
    probability: f64,
    targets: Vec<usize>,
}

impl NoiseSpec {
    pub fn new(kind: NoiseKind, probability: f64, targets: Vec<usize>) -> QResult<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(QuantumError::InvalidParameter(format!(
                "{} probability must be in [0,1], got {probability}",
                kind.name()
            )));
        }
        if targets.is_empty() {
            return Err(QuantumError::invalid_parameter("noise needs at least one target qubit"));
        }
        Ok(Self { kind, probability, targets })
    }

    pub fn kind(&self) -> NoiseKind { self.kind }
    pub fn probability(&self) -> f64 { self.probability }
    pub fn targets(&self) -> &[usize] { &self.targets }
}
