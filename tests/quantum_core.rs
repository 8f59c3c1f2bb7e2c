use std::f64::consts::{FRAC_1_SQRT_2, PI};

use nalgebra::DMatrix;
use num_complex::Complex64 as C64;
use titan_qsim::core::error::QuantumError;
use titan_qsim::core::titan::{
    circuit::GateSpec,
    gates, ops,
    types::{AmplitudeVector, Unitary},
};

fn close(a: C64, b: C64) -> bool {
    (a - b).norm() < 1e-9
}

#[test]
fn hadamard_twice_is_identity() {
    let mut v = AmplitudeVector::new(1).unwrap();
    ops::apply_gate(&mut v, &GateSpec::h(0)).unwrap();
    ops::apply_gate(&mut v, &GateSpec::h(0)).unwrap();
    assert!(close(v.amplitude(0), C64::new(1.0, 0.0)));
    assert!(close(v.amplitude(1), C64::new(0.0, 0.0)));
}

#[test]
fn bell_state_from_h_and_cnot() {
    let mut v = AmplitudeVector::new(2).unwrap();
    ops::apply_all(&mut v, &[GateSpec::h(0), GateSpec::cnot(0, 1).unwrap()]).unwrap();
    let expected = [FRAC_1_SQRT_2, 0.0, 0.0, FRAC_1_SQRT_2];
    for (a, e) in v.amplitudes().iter().zip(expected) {
        assert!(close(*a, C64::new(e, 0.0)), "{:?}", v.amplitudes());
    }
}

#[test]
fn norm_stays_one_across_a_long_circuit() {
    let mut v = AmplitudeVector::new(3).unwrap();
    let circuit = vec![
        GateSpec::h(0),
        GateSpec::ry(1, 0.3).unwrap(),
        GateSpec::cnot(0, 2).unwrap(),
        GateSpec::t(2),
        GateSpec::rx(0, PI / 3.0).unwrap(),
        GateSpec::toffoli(0, 2, 1).unwrap(),
        GateSpec::swap(1, 2).unwrap(),
        GateSpec::cz(2, 0).unwrap(),
        GateSpec::s(1),
        GateSpec::rz(2, -1.1).unwrap(),
        GateSpec::y(0),
    ];
    for g in &circuit {
        ops::apply_gate(&mut v, g).unwrap();
        assert!((v.norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn qubit_zero_is_the_low_bit() {
    let mut v = AmplitudeVector::new(3).unwrap();
    ops::apply_gate(&mut v, &GateSpec::x(0)).unwrap();
    assert!(close(v.amplitude(1), C64::new(1.0, 0.0)));
    assert_eq!(v.basis_label(1), "001");
}

#[test]
fn out_of_range_qubit_is_rejected() {
    let mut v = AmplitudeVector::new(2).unwrap();
    let err = ops::apply_gate(&mut v, &GateSpec::h(2)).unwrap_err();
    assert_eq!(err, QuantumError::InvalidQubitIndex { index: 2, num_qubits: 2 });
    assert_eq!(v, AmplitudeVector::new(2).unwrap());
}

#[test]
fn non_unitary_matrix_is_rejected() {
    let m = DMatrix::from_row_slice(2, 2, &[C64::new(1.0, 0.0), C64::new(1.0, 0.0), C64::new(0.0, 0.0), C64::new(1.0, 0.0)]);
    assert!(matches!(Unitary::try_new(m), Err(QuantumError::NonUnitaryGate(_))));
}

#[test]
fn custom_hadamard_matches_builtin() {
    let u = Unitary::try_new(gates::h()).unwrap();
    let mut a = AmplitudeVector::new(2).unwrap();
    let mut b = a.clone();
    ops::apply_gate(&mut a, &GateSpec::custom(u, vec![1]).unwrap()).unwrap();
    ops::apply_gate(&mut b, &GateSpec::h(1)).unwrap();
    for (x, y) in a.amplitudes().iter().zip(b.amplitudes()) {
        assert!(close(*x, *y));
    }
}

#[test]
fn direct_assignment_checks_length_and_norm() {
    let half = C64::new(0.5, 0.0);
    assert!(AmplitudeVector::from_amplitudes(2, vec![half; 4]).is_ok());
    assert!(matches!(
        AmplitudeVector::from_amplitudes(2, vec![half; 3]),
        Err(QuantumError::InvalidState(_))
    ));
    assert!(matches!(
        AmplitudeVector::from_amplitudes(1, vec![half, half]),
        Err(QuantumError::InvalidState(_))
    ));
}
