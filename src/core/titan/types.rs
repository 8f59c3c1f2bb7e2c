//! Core quantum types for Titan: the amplitude register and registered unitaries.
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64 as C64;

use crate::core::error::{QResult, QuantumError};

/// Norm drift allowed before a vector counts as unnormalized.
pub const NORM_TOL: f64 = 1e-9;
/// Below this norm a vector cannot be renormalized.
pub const DEGENERATE_NORM: f64 = 1e-10;
/// Entry-wise tolerance for `U·U† = I`.
pub const UNITARY_TOL: f64 = 1e-10;
/// Hard ceiling; sessions apply a lower configurable cap.
pub const MAX_QUBITS: usize = 30;

/// Dense state of an n-qubit register. Qubit `k` occupies bit `k` of the basis index.
#[derive(Clone, Debug, PartialEq)]
pub struct AmplitudeVector {
    num_qubits: usize,
    data: DVector<C64>,
}

impl AmplitudeVector {
    /// |0…0⟩ on `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> QResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(QuantumError::InvalidParameter(format!(
                "qubit count must be in 1..={MAX_QUBITS}, got {num_qubits}"
            )));
        }
        let mut data = DVector::from_element(1usize << num_qubits, C64::new(0.0, 0.0));
        data[0] = C64::new(1.0, 0.0);
        Ok(Self { num_qubits, data })
    }

    /// Direct amplitude assignment; rejects wrong lengths and unnormalized input.
    pub fn from_amplitudes(num_qubits: usize, amplitudes: Vec<C64>) -> QResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(QuantumError::InvalidState(format!(
                "qubit count {num_qubits} outside 1..={MAX_QUBITS}"
            )));
        }
        let expected = 1usize << num_qubits;
        if amplitudes.len() != expected {
            return Err(QuantumError::InvalidState(format!(
                "expected {expected} amplitudes for {num_qubits} qubits, got {}",
                amplitudes.len()
            )));
        }
        if amplitudes.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return Err(QuantumError::invalid_state("amplitudes must be finite"));
        }
        let v = Self { num_qubits, data: DVector::from_vec(amplitudes) };
        let norm = v.norm();
        if (norm - 1.0).abs() > NORM_TOL {
            return Err(QuantumError::InvalidState(format!("not normalized (||ψ|| = {norm})")));
        }
        Ok(v)
    }

    pub fn num_qubits(&self) -> usize { self.num_qubits }
    pub fn dim(&self) -> usize { self.data.len() }
    pub fn amplitudes(&self) -> &[C64] { self.data.as_slice() }
    pub fn amplitude(&self, index: usize) -> C64 { self.data[index] }
    pub(crate) fn data(&self) -> &DVector<C64> { &self.data }

    /// Mutable access for the engines in this crate; callers restore the norm invariant.
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [C64] { self.data.as_mut_slice() }

    #[inline]
    pub fn get_bit(index: usize, position: usize) -> usize {
        (index >> position) & 1
    }

    #[inline]
    pub fn flip_bit(index: usize, position: usize) -> usize {
        index ^ (1usize << position)
    }

    pub fn norm(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.data.iter().map(|z| z.norm_sqr()).collect()
    }

    /// Probability that qubit `q` reads 1.
    pub fn marginal_one(&self, qubit: usize) -> f64 {
        self.data
            .iter()
            .enumerate()
            .filter(|(i, _)| Self::get_bit(*i, qubit) == 1)
            .map(|(_, z)| z.norm_sqr())
            .sum()
    }

    pub fn normalize(&mut self) -> QResult<()> {
        let norm = self.norm();
        if norm < DEGENERATE_NORM || !norm.is_finite() {
            return Err(QuantumError::DegenerateState(norm));
        }
        self.data /= C64::from(norm);
        Ok(())
    }

    /// Renormalize only if accumulated rounding pushed the norm off 1.
    pub fn renormalize_if_drifted(&mut self) -> QResult<()> {
        if (self.norm() - 1.0).abs() > NORM_TOL {
            self.normalize()?;
        }
        Ok(())
    }

    pub fn check_qubit(&self, qubit: usize) -> QResult<()> {
        if qubit >= self.num_qubits {
            return Err(QuantumError::InvalidQubitIndex { index: qubit, num_qubits: self.num_qubits });
        }
        Ok(())
    }

    pub fn check_same_size(&self, other: &AmplitudeVector) -> QResult<()> {
        if self.num_qubits != other.num_qubits {
            return Err(QuantumError::DimensionMismatch { left: self.num_qubits, right: other.num_qubits });
        }
        Ok(())
    }

    /// Back to |0…0⟩.
    pub fn reset(&mut self) {
        self.data.fill(C64::new(0.0, 0.0));
        self.data[0] = C64::new(1.0, 0.0);
    }

    /// Ket label with qubit 0 rightmost.
    pub fn basis_label(&self, index: usize) -> String {
        (0..self.num_qubits)
            .rev()
            .map(|q| if Self::get_bit(index, q) == 1 { '1' } else { '0' })
            .collect()
    }
}

/// A custom gate matrix that passed the unitarity check at registration.
#[derive(Clone, Debug, PartialEq)]
pub struct Unitary {
    m: DMatrix<C64>,
}

impl Unitary {
    /// Register a 2×2 (one-qubit) or 4×4 (two-qubit) matrix.
    pub fn try_new(m: DMatrix<C64>) -> QResult<Self> {
        if m.nrows() != m.ncols() {
            return Err(QuantumError::NonUnitaryGate("matrix must be square".into()));
        }
        if m.nrows() != 2 && m.nrows() != 4 {
            return Err(QuantumError::NonUnitaryGate(format!(
                "custom gates must be 2x2 or 4x4, got {}x{}",
                m.nrows(),
                m.ncols()
            )));
        }
        let u_u_dag = &m * m.adjoint();
        let i = DMatrix::<C64>::identity(m.nrows(), m.ncols());
        let max_diff = (u_u_dag - i).iter().map(|z| z.norm()).fold(0.0_f64, f64::max);
        if !(max_diff <= UNITARY_TOL) {
            return Err(QuantumError::NonUnitaryGate(format!("‖UU†−I‖∞ = {max_diff:e}")));
        }
        Ok(Self { m })
    }

    pub fn matrix(&self) -> &DMatrix<C64> { &self.m }

    /// Number of qubits the matrix acts on.
    pub fn arity(&self) -> usize {
        if self.m.nrows() == 2 { 1 } else { 2 }
    }
}
