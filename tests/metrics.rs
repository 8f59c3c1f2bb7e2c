use titan_qsim::core::error::QuantumError;
use titan_qsim::core::titan::{
    circuit::GateSpec,
    metrics::{coherence, entanglement_proxy, fidelity, purity, summarize},
    ops,
    types::AmplitudeVector,
};

fn run(n: usize, gates: &[GateSpec]) -> AmplitudeVector {
    let mut v = AmplitudeVector::new(n).unwrap();
    ops::apply_all(&mut v, gates).unwrap();
    v
}

#[test]
fn fidelity_with_itself_is_one() {
    let v = run(3, &[GateSpec::h(0), GateSpec::ry(1, 0.4).unwrap(), GateSpec::cnot(1, 2).unwrap()]);
    assert!((fidelity(&v, &v).unwrap() - 1.0).abs() < 1e-12);
}

#[test]
fn fidelity_is_symmetric() {
    let a = run(2, &[GateSpec::h(0), GateSpec::t(0)]);
    let b = run(2, &[GateSpec::rx(0, 0.9).unwrap(), GateSpec::cnot(0, 1).unwrap()]);
    let ab = fidelity(&a, &b).unwrap();
    let ba = fidelity(&b, &a).unwrap();
    assert!((ab - ba).abs() < 1e-12);
    assert!((0.0..=1.0).contains(&ab));
}

#[test]
fn fidelity_needs_equal_sizes() {
    let a = AmplitudeVector::new(1).unwrap();
    let b = AmplitudeVector::new(2).unwrap();
    assert!(matches!(fidelity(&a, &b), Err(QuantumError::DimensionMismatch { .. })));
}

#[test]
fn basis_state_has_no_coherence_or_entropy() {
    let v = run(2, &[GateSpec::x(1)]);
    assert!((purity(&v) - 1.0).abs() < 1e-12);
    assert!(coherence(&v).abs() < 1e-12);
    assert!(entanglement_proxy(&v).abs() < 1e-12);
}

#[test]
fn bell_state_proxy_is_one_bit() {
    let v = run(2, &[GateSpec::h(0), GateSpec::cnot(0, 1).unwrap()]);
    assert!((entanglement_proxy(&v) - 1.0).abs() < 1e-9);
    // (Σ|a|)² − Σ|a|² = 2 − 1
    assert!((coherence(&v) - 1.0).abs() < 1e-9);
}

#[test]
fn summary_without_reference_has_no_fidelity() {
    let v = run(1, &[GateSpec::h(0)]);
    let m = summarize(&v, None).unwrap();
    assert!(m.fidelity.is_none());
    assert!((m.purity - 1.0).abs() < 1e-12);
}
