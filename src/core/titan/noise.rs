//! Noise channels (depolarizing, amplitude damping, phase damping).
//!
//! Two application modes are available and a session sticks to one:
//! - `Stochastic`: one Kraus branch is sampled per affected qubit and applied through the
//!   same pairing kernel as a one-qubit gate, then the vector is renormalized.
//! - `Density`: ρ' = Σ K ρ K† on the full register, and the vector is replaced by the
//!   dominant eigenvector of ρ'. The mixedness is lost; its purity is reported back.
use std::f64::consts::TAU;

use nalgebra::{DMatrix, SymmetricEigen};
use num_complex::Complex64 as C64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::{QResult, QuantumError};
use crate::core::titan::circuit::{NoiseKind, NoiseSpec};
use crate::core::titan::gates;
use crate::core::titan::metrics::density_purity;
use crate::core::titan::ops::{apply_1q_matrix, lift_1q};
use crate::core::titan::types::AmplitudeVector;

/// Density mode builds 2^n × 2^n matrices; beyond this it is refused.
pub const DENSITY_MAX_QUBITS: usize = 10;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseMode {
    #[default]
    Stochastic,
    Density,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoiseOutcome {
    /// Non-identity branches taken (stochastic mode only).
    pub events: usize,
    /// tr(ρ'²) before the eigenvector collapse (density mode only).
    pub mixed_purity: Option<f64>,
}

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

fn scaled(m: DMatrix<C64>, k: f64) -> DMatrix<C64> {
    m * c(k, 0.0)
}

/// Single-qubit Kraus family for `kind` at strength `p`; Σ K†K = I.
pub fn kraus_operators(kind: NoiseKind, p: f64) -> Vec<DMatrix<C64>> {
    let o = c(0.0, 0.0);
    let l = c(1.0, 0.0);
    match kind {
        NoiseKind::Depolarizing => vec![
            scaled(gates::i2(), (1.0 - p).sqrt()),
            scaled(gates::x(), (p / 3.0).sqrt()),
            scaled(gates::y(), (p / 3.0).sqrt()),
            scaled(gates::z(), (p / 3.0).sqrt()),
        ],
        NoiseKind::AmplitudeDamping => vec![
            DMatrix::from_row_slice(2, 2, &[l, o, o, c((1.0 - p).sqrt(), 0.0)]),
            DMatrix::from_row_slice(2, 2, &[o, c(p.sqrt(), 0.0), o, o]),
        ],
        NoiseKind::PhaseDamping => vec![
            scaled(gates::i2(), (1.0 - p).sqrt()),
            DMatrix::from_row_slice(2, 2, &[c(p.sqrt(), 0.0), o, o, o]),
            DMatrix::from_row_slice(2, 2, &[o, o, o, c(p.sqrt(), 0.0)]),
        ],
    }
}

/// Apply `spec` to `state`. On error the state is left exactly as it was.
pub fn apply_noise<R: Rng + ?Sized>(
    state: &mut AmplitudeVector,
    spec: &NoiseSpec,
    mode: NoiseMode,
    rng: &mut R,
) -> QResult<NoiseOutcome> {
    for &q in spec.targets() {
        state.check_qubit(q)?;
    }
    let mut scratch = state.clone();
    let outcome = match mode {
        NoiseMode::Stochastic => apply_stochastic(&mut scratch, spec, rng)?,
        NoiseMode::Density => apply_density(&mut scratch, spec)?,
    };
    *state = scratch;
    Ok(outcome)
}

fn apply_stochastic<R: Rng + ?Sized>(
    state: &mut AmplitudeVector,
    spec: &NoiseSpec,
    rng: &mut R,
) -> QResult<NoiseOutcome> {
    let p = spec.probability();
    let mut events = 0;
    for &q in spec.targets() {
        match spec.kind() {
            NoiseKind::Depolarizing => {
                if rng.gen_bool(p) {
                    let (label, pauli) = match rng.gen_range(0..3) {
                        0 => ("x", gates::x()),
                        1 => ("y", gates::y()),
                        _ => ("z", gates::z()),
                    };
                    apply_1q_matrix(state, &pauli, q);
                    events += 1;
                    debug_log!("depolarizing q{q}: {label} error");
                }
            }
            NoiseKind::AmplitudeDamping => {
                // Jump probability for this trajectory is p·P(q = 1).
                let p_jump = p * state.marginal_one(q);
                let kraus = kraus_operators(NoiseKind::AmplitudeDamping, p);
                if rng.gen::<f64>() < p_jump {
                    apply_1q_matrix(state, &kraus[1], q);
                    events += 1;
                    debug_log!("amplitude damping q{q}: decay (p_jump={p_jump:.4})");
                } else {
                    apply_1q_matrix(state, &kraus[0], q);
                }
                state.normalize()?;
            }
            NoiseKind::PhaseDamping => {
                if rng.gen_bool(p) {
                    let theta = rng.gen_range(0.0..TAU);
                    apply_1q_matrix(state, &gates::phase_shift(theta), q);
                    events += 1;
                    debug_log!("phase damping q{q}: kick θ={theta:.4}");
                }
            }
        }
    }
    state.normalize()?;
    Ok(NoiseOutcome { events, mixed_purity: None })
}

fn apply_density(state: &mut AmplitudeVector, spec: &NoiseSpec) -> QResult<NoiseOutcome> {
    let n = state.num_qubits();
    if n > DENSITY_MAX_QUBITS {
        return Err(QuantumError::InvalidParameter(format!(
            "density noise supports at most {DENSITY_MAX_QUBITS} qubits, register has {n}"
        )));
    }
    let psi = state.data().clone();
    let mut rho = &psi * psi.adjoint();
    let kraus = kraus_operators(spec.kind(), spec.probability());
    for &q in spec.targets() {
        let dim = rho.nrows();
        let mut next = DMatrix::<C64>::zeros(dim, dim);
        for k in &kraus {
            let big = lift_1q(k, n, q);
            next += &big * &rho * big.adjoint();
        }
        rho = next;
    }

    let trace = rho.trace().re;
    if trace < 1e-12 {
        return Err(QuantumError::DegenerateState(trace));
    }
    let purity = density_purity(&rho);

    let eigen = SymmetricEigen::new(rho);
    let (imax, _) = eigen
        .eigenvalues
        .iter()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    let dominant = eigen.eigenvectors.column(imax);

    // Fix the global phase so the largest component is real and positive.
    let anchor = dominant.iter().copied().fold(c(0.0, 0.0), |a, z| if z.norm() > a.norm() { z } else { a });
    let phase = if anchor.norm() > 0.0 { anchor.conj() / anchor.norm() } else { c(1.0, 0.0) };
    for (dst, src) in state.amplitudes_mut().iter_mut().zip(dominant.iter()) {
        *dst = src * phase;
    }
    state.normalize()?;
    debug_log!("density {} p={} purity={purity:.6}", spec.kind().name(), spec.probability());
    Ok(NoiseOutcome { events: 0, mixed_purity: Some(purity) })
}
