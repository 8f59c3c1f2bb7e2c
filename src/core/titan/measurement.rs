//! Computational-basis measurement: multi-shot sampling and single-shot collapse.
use std::collections::BTreeMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::Serialize;

use crate::core::error::{QResult, QuantumError};
use crate::core::titan::types::AmplitudeVector;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MeasurementResult {
    pub qubits: Vec<usize>,
    /// Most frequent outcome; ties go to the lexicographically smallest string.
    pub outcome: String,
    pub shots: usize,
    pub histogram: BTreeMap<String, usize>,
}

impl MeasurementResult {
    pub fn count(&self, outcome: &str) -> usize {
        self.histogram.get(outcome).copied().unwrap_or(0)
    }

    pub fn frequency(&self, outcome: &str) -> f64 {
        self.count(outcome) as f64 / self.shots as f64
    }
}

/// Character `k` is the bit of `qubits[k]` in `index`.
pub fn outcome_bits(index: usize, qubits: &[usize]) -> String {
    qubits
        .iter()
        .map(|&q| if AmplitudeVector::get_bit(index, q) == 1 { '1' } else { '0' })
        .collect()
}

fn validate(state: &AmplitudeVector, qubits: &[usize]) -> QResult<()> {
    if qubits.is_empty() {
        return Err(QuantumError::invalid_parameter("measurement needs at least one qubit"));
    }
    for &q in qubits {
        state.check_qubit(q)?;
    }
    Ok(())
}

fn distribution(state: &AmplitudeVector) -> QResult<WeightedIndex<f64>> {
    WeightedIndex::new(state.probabilities()).map_err(|_| QuantumError::DegenerateState(state.norm()))
}

/// Draw `shots` independent basis indices and histogram their bits at `qubits`. The state is not modified.
pub fn sample<R: Rng + ?Sized>(
    state: &AmplitudeVector,
    qubits: &[usize],
    shots: usize,
    rng: &mut R,
) -> QResult<MeasurementResult> {
    validate(state, qubits)?;
    if shots == 0 {
        return Err(QuantumError::EmptyShots);
    }
    let dist = distribution(state)?;
    let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
    for _ in 0..shots {
        let index = dist.sample(rng);
        *histogram.entry(outcome_bits(index, qubits)).or_insert(0) += 1;
    }
    // BTreeMap iterates in key order, so the first maximum wins ties.
    let outcome = histogram
        .iter()
        .fold(None::<(&String, usize)>, |best, (k, &n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((k, n)),
        })
        .map(|(k, _)| k.clone())
        .unwrap_or_default();
    debug_log!("sampled {shots} shots on {:?}: {} distinct outcomes", qubits, histogram.len());
    Ok(MeasurementResult { qubits: qubits.to_vec(), outcome, shots, histogram })
}

/// Single shot that destroys superposition: the state is replaced by its normalized projection onto the outcome.
pub fn measure_collapse<R: Rng + ?Sized>(
    state: &mut AmplitudeVector,
    qubits: &[usize],
    rng: &mut R,
) -> QResult<String> {
    validate(state, qubits)?;
    let index = distribution(state)?.sample(rng);
    let outcome = outcome_bits(index, qubits);

    let mut collapsed = state.clone();
    for (i, amp) in collapsed.amplitudes_mut().iter_mut().enumerate() {
        if qubits.iter().any(|&q| AmplitudeVector::get_bit(i, q) != AmplitudeVector::get_bit(index, q)) {
            *amp = num_complex::Complex64::new(0.0, 0.0);
        }
    }
    collapsed.normalize()?;
    *state = collapsed;
    debug_log!("collapse {:?} -> {outcome}", qubits);
    Ok(outcome)
}
