use num_complex::Complex64 as C64;
use rand::rngs::StdRng;
use rand::SeedableRng;
use titan_qsim::core::titan::{
    circuit::{GateSpec, NoiseKind, NoiseSpec},
    metrics::fidelity,
    noise::{apply_noise, NoiseMode},
    ops,
    types::AmplitudeVector,
};

fn prepared() -> AmplitudeVector {
    let mut v = AmplitudeVector::new(3).unwrap();
    ops::apply_all(
        &mut v,
        &[GateSpec::h(0), GateSpec::cnot(0, 1).unwrap(), GateSpec::ry(2, 0.7).unwrap()],
    )
    .unwrap();
    v
}

#[test]
fn every_channel_leaves_a_normalized_state() {
    let mut rng = StdRng::seed_from_u64(11);
    for mode in [NoiseMode::Stochastic, NoiseMode::Density] {
        for kind in [NoiseKind::Depolarizing, NoiseKind::AmplitudeDamping, NoiseKind::PhaseDamping] {
            for p in [0.0, 0.1, 0.5, 1.0] {
                let mut v = prepared();
                let spec = NoiseSpec::new(kind, p, vec![0, 1, 2]).unwrap();
                apply_noise(&mut v, &spec, mode, &mut rng).unwrap();
                assert!((v.norm() - 1.0).abs() < 1e-9, "{mode:?} {kind:?} p={p}");
            }
        }
    }
}

#[test]
fn zero_probability_is_a_no_op() {
    let mut rng = StdRng::seed_from_u64(5);
    let before = prepared();
    let mut v = before.clone();
    let spec = NoiseSpec::new(NoiseKind::Depolarizing, 0.0, vec![0, 1]).unwrap();
    let outcome = apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).unwrap();
    assert_eq!(outcome.events, 0);
    for (a, b) in v.amplitudes().iter().zip(before.amplitudes()) {
        assert!((a - b).norm() < 1e-12);
    }
}

#[test]
fn full_amplitude_damping_relaxes_to_ground() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut v = AmplitudeVector::new(1).unwrap();
    ops::apply_gate(&mut v, &GateSpec::x(0)).unwrap();
    let spec = NoiseSpec::new(NoiseKind::AmplitudeDamping, 1.0, vec![0]).unwrap();
    apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).unwrap();
    assert!((v.amplitude(0).norm() - 1.0).abs() < 1e-12);
}

#[test]
fn density_mode_reports_mixed_purity() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut v = AmplitudeVector::new(1).unwrap();
    ops::apply_gate(&mut v, &GateSpec::h(0)).unwrap();
    let spec = NoiseSpec::new(NoiseKind::PhaseDamping, 1.0, vec![0]).unwrap();
    let outcome = apply_noise(&mut v, &spec, NoiseMode::Density, &mut rng).unwrap();
    // Full dephasing of |+⟩ leaves diag(1/2, 1/2).
    assert!((outcome.mixed_purity.unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn invalid_probability_never_reaches_the_state() {
    assert!(NoiseSpec::new(NoiseKind::Depolarizing, 1.5, vec![0]).is_err());
    assert!(NoiseSpec::new(NoiseKind::Depolarizing, -0.1, vec![0]).is_err());
    assert!(NoiseSpec::new(NoiseKind::Depolarizing, f64::NAN, vec![0]).is_err());
}

#[test]
fn out_of_range_target_leaves_state_untouched() {
    let mut rng = StdRng::seed_from_u64(3);
    let before = prepared();
    let mut v = before.clone();
    let spec = NoiseSpec::new(NoiseKind::Depolarizing, 1.0, vec![0, 7]).unwrap();
    assert!(apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).is_err());
    assert_eq!(v, before);
}

fn single(gates: &[GateSpec]) -> AmplitudeVector {
    let mut v = AmplitudeVector::new(1).unwrap();
    ops::apply_all(&mut v, gates).unwrap();
    v
}

#[test]
fn stochastic_phase_kick_keeps_populations() {
    let mut rng = StdRng::seed_from_u64(21);
    let plus = single(&[GateSpec::h(0)]);
    let spec = NoiseSpec::new(NoiseKind::PhaseDamping, 1.0, vec![0]).unwrap();
    for _ in 0..20 {
        let mut v = plus.clone();
        let outcome = apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).unwrap();
        assert_eq!(outcome.events, 1);
        assert!((v.amplitude(0).norm_sqr() - 0.5).abs() < 1e-12);
        assert!((v.amplitude(1).norm_sqr() - 0.5).abs() < 1e-12);
        // relative phase of |1⟩ against |0⟩ moved off zero
        let relative = (v.amplitude(1) / v.amplitude(0)).arg();
        assert!(relative.abs() > 1e-9, "phase unchanged: {relative}");
    }
}

#[test]
fn stochastic_depolarizing_at_one_applies_a_pauli_per_target() {
    let mut rng = StdRng::seed_from_u64(8);
    // Bloch vector with every component non-zero, so no Pauli fixes it.
    let prep = [GateSpec::ry(0, 0.7).unwrap(), GateSpec::rz(0, 0.4).unwrap(), GateSpec::ry(1, 1.1).unwrap(), GateSpec::rz(1, -0.6).unwrap()];
    let mut input = AmplitudeVector::new(2).unwrap();
    ops::apply_all(&mut input, &prep).unwrap();

    let paulis = |q: usize| [GateSpec::x(q), GateSpec::y(q), GateSpec::z(q)];
    let spec = NoiseSpec::new(NoiseKind::Depolarizing, 1.0, vec![0, 1]).unwrap();
    for _ in 0..20 {
        let mut v = input.clone();
        let outcome = apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).unwrap();
        assert_eq!(outcome.events, 2);
        assert!(fidelity(&v, &input).unwrap() < 0.99);

        let matches_some_pair = paulis(0).iter().any(|p0| {
            paulis(1).iter().any(|p1| {
                let mut expected = input.clone();
                ops::apply_all(&mut expected, &[p0.clone(), p1.clone()]).unwrap();
                (fidelity(&v, &expected).unwrap() - 1.0).abs() < 1e-9
            })
        });
        assert!(matches_some_pair);
    }
}

/// Trajectory averages of ρ over many seeded runs, starting from |+⟩.
fn averaged_plus(kind: NoiseKind, p: f64, runs: usize) -> (f64, C64) {
    let mut rng = StdRng::seed_from_u64(1234);
    let plus = single(&[GateSpec::h(0)]);
    let spec = NoiseSpec::new(kind, p, vec![0]).unwrap();
    let (mut p1, mut rho01) = (0.0, C64::new(0.0, 0.0));
    for _ in 0..runs {
        let mut v = plus.clone();
        apply_noise(&mut v, &spec, NoiseMode::Stochastic, &mut rng).unwrap();
        p1 += v.amplitude(1).norm_sqr();
        rho01 += v.amplitude(0) * v.amplitude(1).conj();
    }
    (p1 / runs as f64, rho01 / runs as f64)
}

#[test]
fn trajectories_average_to_the_kraus_channel() {
    // Phase damping: populations stay at 1/2, coherence shrinks to (1 - p)/2.
    let (p1, rho01) = averaged_plus(NoiseKind::PhaseDamping, 0.4, 20_000);
    assert!((p1 - 0.5).abs() < 1e-9);
    assert!((rho01.re - 0.3).abs() < 0.02, "{rho01}");
    assert!(rho01.im.abs() < 0.02, "{rho01}");

    // Amplitude damping: P(1) = (1 - p)/2, coherence √(1 - p)/2.
    let (p1, rho01) = averaged_plus(NoiseKind::AmplitudeDamping, 0.3, 20_000);
    assert!((p1 - 0.35).abs() < 0.02, "{p1}");
    assert!((rho01.re - 0.7_f64.sqrt() / 2.0).abs() < 0.02, "{rho01}");
}
