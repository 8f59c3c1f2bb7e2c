//! Standard quantum gate matrices.
use nalgebra::DMatrix;
use num_complex::Complex64 as C64;

use crate::core::titan::circuit::GateKind;

#[inline]
fn c(r: f64, i: f64) -> C64 {
    C64::new(r, i)
}

pub fn i2() -> DMatrix<C64> {
    DMatrix::identity(2, 2)
}
pub fn x() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(1.0, 0.0), c(1.0, 0.0), c(0.0, 0.0)])
}
pub fn y() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(0.0, 0.0), c(0.0, -1.0), c(0.0, 1.0), c(0.0, 0.0)])
}
pub fn z() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(-1.0, 0.0)])
}
pub fn h() -> DMatrix<C64> {
    let s = 1.0_f64 / 2.0_f64.sqrt();
    DMatrix::from_row_slice(2, 2, &[c(s, 0.0), c(s, 0.0), c(s, 0.0), c(-s, 0.0)])
}
pub fn s() -> DMatrix<C64> {
    DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(0.0, 1.0)])
}
pub fn t() -> DMatrix<C64> {
    phase_shift(std::f64::consts::FRAC_PI_4)
}
/// diag(1, e^{iφ})
pub fn phase_shift(phi: f64) -> DMatrix<C64> {
    DMatrix::from_row_slice(
        2,
        2,
        &[c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), C64::from_polar(1.0, phi)],
    )
}
pub fn rx(theta: f64) -> DMatrix<C64> {
    let (c0, s0) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    DMatrix::from_row_slice(2, 2, &[c(c0, 0.0), c(0.0, -s0), c(0.0, -s0), c(c0, 0.0)])
}
pub fn ry(theta: f64) -> DMatrix<C64> {
    let (c0, s0) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    DMatrix::from_row_slice(2, 2, &[c(c0, 0.0), c(-s0, 0.0), c(s0, 0.0), c(c0, 0.0)])
}
pub fn rz(theta: f64) -> DMatrix<C64> {
    let e_m = C64::from_polar(1.0, -theta / 2.0);
    let e_p = C64::from_polar(1.0, theta / 2.0);
    DMatrix::from_row_slice(2, 2, &[e_m, c(0.0, 0.0), c(0.0, 0.0), e_p])
}

/// The matrix applied to the target subspace of `kind`.
///
/// Controlled kinds return the 2×2 block acting on the target once the controls are satisfied;
/// SWAP returns `None` because it is a permutation handled without a matrix.
pub fn target_matrix(kind: &GateKind) -> Option<DMatrix<C64>> {
    Some(match kind {
        GateKind::PauliX | GateKind::Cnot | GateKind::Toffoli => x(),
        GateKind::PauliY => y(),
        GateKind::PauliZ | GateKind::Cz => z(),
        GateKind::Hadamard => h(),
        GateKind::Phase => s(),
        GateKind::T => t(),
        GateKind::Rx(theta) => rx(*theta),
        GateKind::Ry(theta) => ry(*theta),
        GateKind::Rz(theta) => rz(*theta),
        GateKind::Custom(u) => u.matrix().clone(),
        GateKind::Swap => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::titan::types::Unitary;

    #[test]
    fn standard_gates_are_unitary() {
        for m in [i2(), x(), y(), z(), h(), s(), t(), rx(0.3), ry(-1.2), rz(2.5), phase_shift(0.7)] {
            assert!(Unitary::try_new(m).is_ok());
        }
    }

    #[test]
    fn t_squared_is_s() {
        let tt = t() * t();
        let diff = (tt - s()).iter().map(|z| z.norm()).fold(0.0_f64, f64::max);
        assert!(diff < 1e-12);
    }
}
