//! A simulation session: one live register plus everything needed to drive it.
//!
//! The session owns its vector, a noise-free reference copy (for fidelity), the qubit
//! name table and the random generator. Nothing here is global; pass the session around.
use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::error::{QResult, QuantumError};
use crate::core::titan::circuit::{GateSpec, NoiseSpec};
use crate::core::titan::measurement::{self, MeasurementResult};
use crate::core::titan::metrics::{self, CircuitMetrics};
use crate::core::titan::noise::{self, NoiseMode, NoiseOutcome};
use crate::core::titan::ops;
use crate::core::titan::snapshot::StateSnapshot;
use crate::core::titan::types::AmplitudeVector;

pub struct Session {
    state: AmplitudeVector,
    ideal: AmplitudeVector,
    names: BTreeMap<String, usize>,
    rng: StdRng,
    mode: NoiseMode,
    history: Vec<GateSpec>,
    mixed_purity: Option<f64>,
}

impl Session {
    /// `seed = None` draws the generator from OS entropy.
    pub fn new(num_qubits: usize, names: &[String], seed: Option<u64>, mode: NoiseMode) -> QResult<Self> {
        let state = AmplitudeVector::new(num_qubits)?;
        if names.len() > num_qubits {
            return Err(QuantumError::InvalidParameter(format!(
                "{} names given for {num_qubits} qubits",
                names.len()
            )));
        }
        let mut session = Self {
            ideal: state.clone(),
            state,
            names: BTreeMap::new(),
            rng: match seed {
                Some(s) => StdRng::seed_from_u64(s),
                None => StdRng::from_entropy(),
            },
            mode,
            history: Vec::new(),
            mixed_purity: None,
        };
        for (index, name) in names.iter().enumerate() {
            session.name_qubit(name, index)?;
        }
        Ok(session)
    }

    pub fn num_qubits(&self) -> usize { self.state.num_qubits() }
    pub fn state(&self) -> &AmplitudeVector { &self.state }
    pub fn noise_mode(&self) -> NoiseMode { self.mode }
    pub fn history(&self) -> &[GateSpec] { &self.history }
    pub fn names(&self) -> &BTreeMap<String, usize> { &self.names }

    pub fn name_qubit(&mut self, name: &str, index: usize) -> QResult<()> {
        self.state.check_qubit(index)?;
        if name.parse::<usize>().is_ok() {
            return Err(QuantumError::InvalidParameter(format!("qubit name '{name}' must not be numeric")));
        }
        if let Some(&bound) = self.names.get(name) {
            if bound != index {
                return Err(QuantumError::InvalidParameter(format!("qubit name '{name}' already names qubit {bound}")));
            }
        }
        self.names.insert(name.to_string(), index);
        Ok(())
    }

    /// Accept either a declared name or a plain index.
    pub fn resolve(&self, token: &str) -> QResult<usize> {
        let index = match self.names.get(token) {
            Some(&i) => i,
            None => token
                .parse::<usize>()
                .map_err(|_| QuantumError::InvalidParameter(format!("unknown qubit '{token}'")))?,
        };
        self.state.check_qubit(index)?;
        Ok(index)
    }

    pub fn apply_gate(&mut self, spec: &GateSpec) -> QResult<()> {
        ops::apply_gate(&mut self.state, spec)?;
        ops::apply_gate(&mut self.ideal, spec)?;
        self.history.push(spec.clone());
        Ok(())
    }

    pub fn apply_noise(&mut self, spec: &NoiseSpec) -> QResult<NoiseOutcome> {
        let outcome = noise::apply_noise(&mut self.state, spec, self.mode, &mut self.rng)?;
        if outcome.mixed_purity.is_some() {
            self.mixed_purity = outcome.mixed_purity;
        }
        Ok(outcome)
    }

    pub fn sample(&mut self, qubits: &[usize], shots: usize) -> QResult<MeasurementResult> {
        measurement::sample(&self.state, qubits, shots, &mut self.rng)
    }

    /// Collapse the live state; the noise-free reference restarts from the collapsed state.
    pub fn collapse(&mut self, qubits: &[usize]) -> QResult<String> {
        let outcome = measurement::measure_collapse(&mut self.state, qubits, &mut self.rng)?;
        self.ideal = self.state.clone();
        self.mixed_purity = None;
        Ok(outcome)
    }

    /// Purity reflects the last density-mode channel if one ran; fidelity is against the noise-free run.
    pub fn metrics(&self) -> QResult<CircuitMetrics> {
        let mut m = metrics::summarize(&self.state, Some(&self.ideal))?;
        if let Some(p) = self.mixed_purity {
            m.purity = p;
        }
        Ok(m)
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.ideal.reset();
        self.history.clear();
        self.mixed_purity = None;
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(&self.state)
    }

    /// Replace the live state; the register size must match.
    pub fn restore(&mut self, snapshot: &StateSnapshot) -> QResult<()> {
        let restored = snapshot.restore()?;
        self.state.check_same_size(&restored)?;
        self.ideal = restored.clone();
        self.state = restored;
        self.mixed_purity = None;
        Ok(())
    }
}
