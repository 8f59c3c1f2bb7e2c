//! JSON state dump: `{ "num_qubits": n, "amplitudes": [[re, im], ...] }`.
use std::path::Path;

use anyhow::{Context, Result};
use num_complex::Complex64 as C64;
use serde::{Deserialize, Serialize};

use crate::core::error::{QResult, QuantumError};
use crate::core::titan::types::AmplitudeVector;
use crate::io::atomic::atomic_write;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub num_qubits: usize,
    pub amplitudes: Vec<[f64; 2]>,
}

impl StateSnapshot {
    pub fn capture(state: &AmplitudeVector) -> Self {
        Self {
            num_qubits: state.num_qubits(),
            amplitudes: state.amplitudes().iter().map(|z| [z.re, z.im]).collect(),
        }
    }

    /// Validate shape and norm, then build the vector.
    pub fn restore(&self) -> QResult<AmplitudeVector> {
        let amps = self.amplitudes.iter().map(|[re, im]| C64::new(*re, *im)).collect();
        AmplitudeVector::from_amplitudes(self.num_qubits, amps)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing state snapshot")
    }

    pub fn from_json(text: &str) -> QResult<Self> {
        serde_json::from_str(text).map_err(|e| QuantumError::InvalidState(format!("malformed snapshot: {e}")))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_json()?).with_context(|| format!("writing {}", path.display()))
    }

    pub fn load(path: &Path) -> Result<AmplitudeVector> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let snap = Self::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
        snap.restore().with_context(|| format!("validating {}", path.display()))
    }
}
