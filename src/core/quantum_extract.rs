//! Textual and JSON views of a gate sequence.
use anyhow::{Context, Result};
use serde::Serialize;

use crate::core::titan::circuit::GateSpec;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GateRecord {
    pub gate: String,
    pub targets: Vec<usize>,
    pub controls: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
}

impl From<&GateSpec> for GateRecord {
    fn from(g: &GateSpec) -> Self {
        GateRecord {
            gate: g.kind().name().to_string(),
            targets: g.targets().to_vec(),
            controls: g.controls().to_vec(),
            angle: g.kind().angle(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct CircuitExport {
    pub num_qubits: usize,
    pub gates: Vec<GateRecord>,
}

pub fn circuit_to_json(num_qubits: usize, gates: &[GateSpec]) -> Result<String> {
    let c = CircuitExport { num_qubits, gates: gates.iter().map(GateRecord::from).collect() };
    serde_json::to_string_pretty(&c).context("serializing circuit")
}

// Assembly-like listing (not full OpenQASM; custom matrices appear only by name)
// Format:
// qreg q[<count>];\n
// <gate>[(<angle>)] q[t]...[, q[c]...];
pub fn circuit_to_listing(num_qubits: usize, gates: &[GateSpec]) -> String {
    let fmt_qubits = |qs: &[usize]| qs.iter().map(|q| format!("q[{q}]")).collect::<Vec<_>>().join(" ");
    let mut out = format!("qreg q[{num_qubits}];\n");
    for g in gates {
        let name = match g.kind().angle() {
            Some(a) => format!("{}({:.6})", g.kind().name(), a),
            None => g.kind().name().to_string(),
        };
        out.push_str(&format!("{} {}", name, fmt_qubits(g.targets())));
        if !g.controls().is_empty() {
            out.push_str(&format!(", {}", fmt_qubits(g.controls())));
        }
        out.push_str(";\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_has_one_line_per_gate() {
        let gates = vec![GateSpec::h(0), GateSpec::cnot(0, 1).unwrap()];
        let text = circuit_to_listing(2, &gates);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("cx q[1], q[0];"));
    }

    #[test]
    fn json_skips_missing_angles() {
        let json = circuit_to_json(1, &[GateSpec::x(0)]).unwrap();
        assert!(!json.contains("angle"));
        assert!(json.contains("\"gate\": \"x\""));
    }
}
