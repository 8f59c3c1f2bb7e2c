//! Summary statistics over amplitude vectors.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;
use serde::Serialize;

use crate::core::error::QResult;
use crate::core::titan::types::AmplitudeVector;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CircuitMetrics {
    pub purity: f64,
    pub coherence: f64,
    /// Against a reference vector, when one was supplied.
    pub fidelity: Option<f64>,
    pub entanglement_proxy: f64,
}

/// tr(ρ²) for ρ = |ψ⟩⟨ψ|, i.e. ⟨ψ|ψ⟩². Always 1 for a normalized vector.
pub fn purity(state: &AmplitudeVector) -> f64 {
    let p: f64 = state.amplitudes().iter().map(|z| z.norm_sqr()).sum();
    p * p
}

/// tr(ρ²)/tr(ρ)² of an explicit density matrix.
pub fn density_purity(rho: &DMatrix<C64>) -> f64 {
    let tr = rho.trace().re;
    (rho * rho).trace().re / (tr * tr)
}

/// |⟨v1|v2⟩|²
pub fn fidelity(v1: &AmplitudeVector, v2: &AmplitudeVector) -> QResult<f64> {
    v1.check_same_size(v2)?;
    let overlap: C64 = v1.amplitudes().iter().zip(v2.amplitudes()).map(|(a, b)| a.conj() * b).sum();
    Ok(overlap.norm_sqr().min(1.0))
}

/// l1 norm of the off-diagonal part of |ψ⟩⟨ψ|: Σ_{i≠j} |a_i||a_j| = (Σ|a_i|)² − Σ|a_i|².
pub fn coherence(state: &AmplitudeVector) -> f64 {
    let l1: f64 = state.amplitudes().iter().map(|z| z.norm()).sum();
    let l2: f64 = state.amplitudes().iter().map(|z| z.norm_sqr()).sum();
    (l1 * l1 - l2).max(0.0)
}

/// Shannon entropy (bits) of the basis-state distribution, clipped to `[0, n]`.
///
/// This is a heuristic, not the von Neumann entropy of a reduced subsystem: a product
/// state like |+⟩|+⟩ scores 2 although it carries no entanglement.
pub fn entanglement_proxy(state: &AmplitudeVector) -> f64 {
    let h: f64 = state
        .probabilities()
        .into_iter()
        .filter(|&p| p > 1e-15)
        .map(|p| -p * p.log2())
        .sum();
    h.clamp(0.0, state.num_qubits() as f64)
}

pub fn summarize(state: &AmplitudeVector, reference: Option<&AmplitudeVector>) -> QResult<CircuitMetrics> {
    let fidelity = match reference {
        Some(r) => Some(fidelity(state, r)?),
        None => None,
    };
    Ok(CircuitMetrics {
        purity: purity(state),
        coherence: coherence(state),
        fidelity,
        entanglement_proxy: entanglement_proxy(state),
    })
}
