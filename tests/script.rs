use titan_qsim::core::quantum_extract::{circuit_to_json, circuit_to_listing};
use titan_qsim::core::quantum_ir::{parse_program, Event, Interpreter, RunSettings};
use titan_qsim::core::titan::optimizer::CircuitOptimizer;

const BELL: &str = "\
# bell pair
CREATE 2 a b
GATE h a
GATE cnot b a
GATE rx 1 pi/2
";

fn seeded() -> Interpreter {
    Interpreter::new(RunSettings { seed: Some(42), ..RunSettings::default() })
}

#[test]
fn listing_of_a_parsed_script() {
    let program = parse_program(BELL).unwrap();
    let text = circuit_to_listing(2, &program.gates());
    insta::assert_snapshot!(text.trim_end(), @r"
    qreg q[2];
    h q[0];
    cx q[1], q[0];
    rx(1.570796) q[1];
    ");
}

#[test]
fn json_export_names_every_gate() {
    let program = parse_program(BELL).unwrap();
    let json: serde_json::Value = serde_json::from_str(&circuit_to_json(2, &program.gates()).unwrap()).unwrap();
    let names: Vec<&str> = json["gates"].as_array().unwrap().iter().map(|g| g["gate"].as_str().unwrap()).collect();
    assert_eq!(names, ["h", "cx", "rx"]);
    assert_eq!(json["gates"][1]["controls"], serde_json::json!([0]));
}

#[test]
fn measure_between_gate_runs_blocks_optimization() {
    let src = "CREATE 1\nGATE h 0\nMEASURE 0 10\nGATE h 0\n";
    let (optimized, report) = parse_program(src).unwrap().optimized(&CircuitOptimizer::new());
    assert_eq!(optimized.gates().len(), 2);
    assert_eq!(report.before, report.after);

    let (folded, _) = parse_program("CREATE 1\nGATE h 0\nGATE h 0\nMETRICS\n")
        .unwrap()
        .optimized(&CircuitOptimizer::new());
    assert!(folded.gates().is_empty());
}

#[test]
fn seeded_runs_are_reproducible() {
    let src = "CREATE 2\nGATE h 0\nNOISE depolarizing 0.3 0,1\nMEASURE 0,1 256\n";
    let program = parse_program(src).unwrap();
    let a = seeded().run_program(&program).unwrap();
    let b = seeded().run_program(&program).unwrap();
    assert_eq!(a, b);
}

#[test]
fn metrics_after_a_bell_pair() {
    let mut it = seeded();
    for line in ["CREATE 2", "GATE h 0", "GATE cx 1 0"] {
        it.run_line(line).unwrap();
    }
    match it.run_line("METRICS").unwrap() {
        Some(Event::Metrics(m)) => {
            assert!((m.fidelity.unwrap() - 1.0).abs() < 1e-12);
            assert!((m.entanglement_proxy - 1.0).abs() < 1e-9);
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn collapse_then_resample_is_deterministic() {
    let mut it = seeded();
    it.run_line("CREATE 2").unwrap();
    it.run_line("GATE h 0").unwrap();
    it.run_line("GATE cnot 1 0").unwrap();
    let Some(Event::Collapsed { outcome, .. }) = it.run_line("MEASURE 0").unwrap() else {
        panic!("expected a collapse");
    };
    let Some(Event::Sampled(r)) = it.run_line("MEASURE 0,1 50").unwrap() else {
        panic!("expected samples");
    };
    assert_eq!(r.histogram.len(), 1);
    assert_eq!(r.outcome, outcome.repeat(2));
}

#[test]
fn register_limit_is_enforced() {
    let mut it = Interpreter::new(RunSettings { max_qubits: 4, ..RunSettings::default() });
    assert!(it.run_line("CREATE 5").is_err());
    assert!(it.run_line("CREATE 4").is_ok());
}
