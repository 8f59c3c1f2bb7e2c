//! Gate application by bit-indexed amplitude pairing, plus Kronecker lifts.
//!
//! Every kernel here is linear in the state size: a one-qubit matrix touches each
//! `(i, i ^ 1<<t)` pair exactly once.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::error::QResult;
use crate::core::titan::circuit::{GateKind, GateSpec};
use crate::core::titan::gates;
use crate::core::titan::types::AmplitudeVector;

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

/// Apply `spec` to `state` in place. Indices are checked before anything is touched.
pub fn apply_gate(state: &mut AmplitudeVector, spec: &GateSpec) -> QResult<()> {
    for &q in spec.targets().iter().chain(spec.controls()) {
        state.check_qubit(q)?;
    }
    let targets = spec.targets();
    match spec.kind() {
        GateKind::Swap => apply_swap(state, targets[0], targets[1]),
        GateKind::Custom(u) if u.arity() == 2 => apply_2q_matrix(state, u.matrix(), targets[0], targets[1]),
        kind => {
            if let Some(m) = gates::target_matrix(kind) {
                apply_controlled_1q(state, &m, targets[0], spec.controls());
            }
        }
    }
    debug_log!(
        "gate {} targets={:?} controls={:?}",
        spec.kind().name(),
        spec.targets(),
        spec.controls()
    );
    state.renormalize_if_drifted()
}

/// Replay a whole sequence; stops at the first failing gate.
pub fn apply_all(state: &mut AmplitudeVector, specs: &[GateSpec]) -> QResult<()> {
    for spec in specs {
        apply_gate(state, spec)?;
    }
    Ok(())
}

/// 2×2 `m` on qubit `target`. The matrix need not be unitary (Kraus branches reuse this).
pub(crate) fn apply_1q_matrix(state: &mut AmplitudeVector, m: &DMatrix<C64>, target: usize) {
    apply_controlled_1q(state, m, target, &[]);
}

/// 2×2 `m` on `target`, restricted to basis states where every control bit is 1.
pub(crate) fn apply_controlled_1q(state: &mut AmplitudeVector, m: &DMatrix<C64>, target: usize, controls: &[usize]) {
    let (m00, m01, m10, m11) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);
    let control_mask = controls.iter().fold(0usize, |acc, &q| acc | (1usize << q));
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if AmplitudeVector::get_bit(i, target) != 0 || i & control_mask != control_mask {
            continue;
        }
        let j = AmplitudeVector::flip_bit(i, target);
        let (a, b) = (amps[i], amps[j]);
        amps[i] = m00 * a + m01 * b;
        amps[j] = m10 * a + m11 * b;
    }
}

/// Exchange qubits `a` and `b`; each differing pair is visited once (from the side where `a` is 0).
pub(crate) fn apply_swap(state: &mut AmplitudeVector, a: usize, b: usize) {
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if AmplitudeVector::get_bit(i, a) == 0 && AmplitudeVector::get_bit(i, b) == 1 {
            let j = AmplitudeVector::flip_bit(AmplitudeVector::flip_bit(i, a), b);
            amps.swap(i, j);
        }
    }
}

/// 4×4 `m` on (`q0`, `q1`); local basis index is `bit(q0) | bit(q1) << 1`.
pub(crate) fn apply_2q_matrix(state: &mut AmplitudeVector, m: &DMatrix<C64>, q0: usize, q1: usize) {
    let amps = state.amplitudes_mut();
    for i in 0..amps.len() {
        if AmplitudeVector::get_bit(i, q0) != 0 || AmplitudeVector::get_bit(i, q1) != 0 {
            continue;
        }
        let idx = [i, i | (1usize << q0), i | (1usize << q1), i | (1usize << q0) | (1usize << q1)];
        let local = [amps[idx[0]], amps[idx[1]], amps[idx[2]], amps[idx[3]]];
        for (row, &out) in idx.iter().enumerate() {
            amps[out] = (0..4).map(|col| m[(row, col)] * local[col]).sum();
        }
    }
}

/// Kronecker product A ⊗ B
pub fn kron(a: &DMatrix<C64>, b: &DMatrix<C64>) -> DMatrix<C64> {
    let (ar, ac) = (a.nrows(), a.ncols());
    let (br, bc) = (b.nrows(), b.ncols());
    let mut out = DMatrix::<C64>::from_element(ar * br, ac * bc, c(0.0, 0.0));
    for i in 0..ar {
        for j in 0..ac {
            let aij = a[(i, j)];
            for k in 0..br {
                for l in 0..bc {
                    out[(i * br + k, j * bc + l)] = aij * b[(k, l)];
                }
            }
        }
    }
    out
}

/// Promote a 2×2 operator `u` onto `n_qubits`, acting on `target` (qubit 0 = least significant).
pub fn lift_1q(u: &DMatrix<C64>, n_qubits: usize, target: usize) -> DMatrix<C64> {
    debug_assert!(u.nrows() == 2 && u.ncols() == 2 && target < n_qubits);
    // Highest qubit is the leftmost Kronecker factor.
    let i2 = gates::i2();
    let mut acc = DMatrix::<C64>::from_element(1, 1, c(1.0, 0.0));
    for q in (0..n_qubits).rev() {
        let m = if q == target { u } else { &i2 };
        acc = kron(&acc, m);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::titan::types::Unitary;
    use nalgebra::DVector;

    fn approx(a: &[C64], b: &[C64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).norm() < 1e-10)
    }

    /// A fixed, normalized, fully generic 3-qubit state.
    fn scrambled() -> AmplitudeVector {
        let mut v = AmplitudeVector::new(3).unwrap();
        for spec in [GateSpec::h(0), GateSpec::ry(1, 0.7).unwrap(), GateSpec::t(0), GateSpec::rx(2, 1.9).unwrap()] {
            apply_gate(&mut v, &spec).unwrap();
        }
        apply_gate(&mut v, &GateSpec::cnot(0, 2).unwrap()).unwrap();
        v
    }

    #[test]
    fn pairing_matches_lifted_matrix() {
        let v = scrambled();
        for target in 0..3 {
            let mut fast = v.clone();
            apply_gate(&mut fast, &GateSpec::ry(target, 0.42).unwrap()).unwrap();
            let full = lift_1q(&gates::ry(0.42), 3, target) * DVector::from_column_slice(v.amplitudes());
            assert!(approx(fast.amplitudes(), full.as_slice()), "target {target}");
        }
    }

    #[test]
    fn swap_exchanges_qubits() {
        let mut v = AmplitudeVector::new(3).unwrap();
        apply_gate(&mut v, &GateSpec::x(0)).unwrap();
        apply_gate(&mut v, &GateSpec::swap(0, 2).unwrap()).unwrap();
        assert!((v.amplitude(0b100).norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn toffoli_needs_both_controls() {
        let mut v = AmplitudeVector::new(3).unwrap();
        apply_gate(&mut v, &GateSpec::x(0)).unwrap();
        apply_gate(&mut v, &GateSpec::toffoli(0, 1, 2).unwrap()).unwrap();
        assert!((v.amplitude(0b001).norm() - 1.0).abs() < 1e-12);
        apply_gate(&mut v, &GateSpec::x(1)).unwrap();
        apply_gate(&mut v, &GateSpec::toffoli(0, 1, 2).unwrap()).unwrap();
        assert!((v.amplitude(0b111).norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn custom_two_qubit_cnot_matches_builtin() {
        let o = c(0.0, 0.0);
        let l = c(1.0, 0.0);
        // Local index bit0 = q0 (control), bit1 = q1 (target).
        let m = DMatrix::from_row_slice(4, 4, &[
            l, o, o, o,
            o, o, o, l,
            o, o, l, o,
            o, l, o, o,
        ]);
        let u = Unitary::try_new(m).unwrap();
        let mut a = scrambled();
        let mut b = a.clone();
        apply_gate(&mut a, &GateSpec::custom(u, vec![0, 1]).unwrap()).unwrap();
        apply_gate(&mut b, &GateSpec::cnot(0, 1).unwrap()).unwrap();
        assert!(approx(a.amplitudes(), b.amplitudes()));
    }

    #[test]
    fn out_of_range_leaves_state_untouched() {
        let mut v = scrambled();
        let before = v.clone();
        assert!(apply_gate(&mut v, &GateSpec::cnot(0, 5).unwrap()).is_err());
        assert_eq!(v, before);
    }
}
