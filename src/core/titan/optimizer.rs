//! Algebraic rewriting of gate sequences, ahead of simulation.
//!
//! Each rule makes one left-to-right pass and never re-scans its own output, so
//! `H X X H` only loses the inner pair. Call `optimize` again to reach further reductions.
use crate::core::titan::circuit::{GateKind, GateSpec};

/// Tolerance below which a merged rotation angle counts as zero.
pub const ANGLE_EPS: f64 = 1e-10;

/// One rewrite rule over a gate sequence.
pub trait RewriteRule {
    fn name(&self) -> &str;

    /// Produce the rewritten sequence; the input is left alone.
    fn rewrite(&self, ops: &[GateSpec]) -> Vec<GateSpec>;
}

/// Two adjacent identical self-inverse one-qubit gates (H, X, Y, Z) on the same qubit.
pub struct CancelSelfInverse;

impl RewriteRule for CancelSelfInverse {
    fn name(&self) -> &str {
        "cancel-self-inverse"
    }

    fn rewrite(&self, ops: &[GateSpec]) -> Vec<GateSpec> {
        let mut out = Vec::with_capacity(ops.len());
        let mut i = 0;
        while i < ops.len() {
            if let Some(next) = ops.get(i + 1) {
                let a = &ops[i];
                if a.kind().is_self_inverse()
                    && a.kind() == next.kind()
                    && a.sole_target().is_some()
                    && a.sole_target() == next.sole_target()
                {
                    i += 2;
                    continue;
                }
            }
            out.push(ops[i].clone());
            i += 1;
        }
        out
    }
}

/// Two adjacent rotations about the same axis on the same qubit become one; a zero sum vanishes.
pub struct MergeRotations;

impl RewriteRule for MergeRotations {
    fn name(&self) -> &str {
        "merge-rotations"
    }

    fn rewrite(&self, ops: &[GateSpec]) -> Vec<GateSpec> {
        let mut out = Vec::with_capacity(ops.len());
        let mut i = 0;
        while i < ops.len() {
            if let Some(merged) = ops.get(i + 1).and_then(|next| merge_pair(&ops[i], next)) {
                out.extend(merged);
                i += 2;
                continue;
            }
            out.push(ops[i].clone());
            i += 1;
        }
        out
    }
}

/// `Some(None)` when the pair cancels, `Some(Some(g))` when it merges, `None` when it does not apply.
fn merge_pair(a: &GateSpec, b: &GateSpec) -> Option<Option<GateSpec>> {
    let (axis_a, theta_a) = a.kind().rotation()?;
    let (axis_b, theta_b) = b.kind().rotation()?;
    let target = a.sole_target()?;
    if axis_a != axis_b || b.sole_target() != Some(target) {
        return None;
    }
    let sum = theta_a + theta_b;
    if sum.abs() < ANGLE_EPS {
        return Some(None);
    }
    GateSpec::new(GateKind::rotation_about(axis_a, sum), vec![target], vec![])
        .ok()
        .map(Some)
}

/// `CX(a,b) CX(a,b)` cancels; `CX(a,b) CX(b,a) CX(a,b)` becomes `SWAP(a,b)`.
/// Identical adjacent CZ or SWAP pairs also cancel.
pub struct TwoQubitElimination;

fn cx_pair(g: &GateSpec) -> Option<(usize, usize)> {
    match (g.kind(), g.controls(), g.targets()) {
        (GateKind::Cnot, [c], [t]) => Some((*c, *t)),
        _ => None,
    }
}

fn same_symmetric_pair(a: &GateSpec, b: &GateSpec) -> bool {
    let sorted = |g: &GateSpec| {
        let mut q: Vec<usize> = g.targets().iter().chain(g.controls()).copied().collect();
        q.sort_unstable();
        q
    };
    matches!(
        (a.kind(), b.kind()),
        (GateKind::Cz, GateKind::Cz) | (GateKind::Swap, GateKind::Swap)
    ) && sorted(a) == sorted(b)
}

impl RewriteRule for TwoQubitElimination {
    fn name(&self) -> &str {
        "two-qubit-elimination"
    }

    fn rewrite(&self, ops: &[GateSpec]) -> Vec<GateSpec> {
        let mut out = Vec::with_capacity(ops.len());
        let mut i = 0;
        while i < ops.len() {
            let first = cx_pair(&ops[i]);
            let second = ops.get(i + 1).and_then(cx_pair);
            let third = ops.get(i + 2).and_then(cx_pair);
            if let (Some((a, b)), Some(s), Some(t)) = (first, second, third) {
                if s == (b, a) && t == (a, b) {
                    if let Ok(swap) = GateSpec::swap(a, b) {
                        out.push(swap);
                        i += 3;
                        continue;
                    }
                }
            }
            if first.is_some() && first == second {
                i += 2;
                continue;
            }
            if let Some(next) = ops.get(i + 1) {
                if same_symmetric_pair(&ops[i], next) {
                    i += 2;
                    continue;
                }
            }
            out.push(ops[i].clone());
            i += 1;
        }
        out
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptimizationReport {
    pub before: usize,
    pub after: usize,
    /// (rule name, gates removed by that rule)
    pub removed_by_rule: Vec<(String, usize)>,
}

pub struct CircuitOptimizer {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Default for CircuitOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitOptimizer {
    /// Cancellation, then rotation merging, then two-qubit elimination.
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(CancelSelfInverse), Box::new(MergeRotations), Box::new(TwoQubitElimination)],
        }
    }

    pub fn with_rules(rules: Vec<Box<dyn RewriteRule>>) -> Self {
        Self { rules }
    }

    pub fn optimize(&self, ops: &[GateSpec]) -> Vec<GateSpec> {
        self.optimize_with_report(ops).0
    }

    pub fn optimize_with_report(&self, ops: &[GateSpec]) -> (Vec<GateSpec>, OptimizationReport) {
        let mut report = OptimizationReport { before: ops.len(), ..Default::default() };
        let mut current = ops.to_vec();
        for rule in &self.rules {
            let next = rule.rewrite(&current);
            let removed = current.len().saturating_sub(next.len());
            debug_log!("optimizer {}: {} -> {} gates", rule.name(), current.len(), next.len());
            report.removed_by_rule.push((rule.name().to_string(), removed));
            current = next;
        }
        report.after = current.len();
        (current, report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn different_targets_do_not_cancel() {
        let ops = vec![GateSpec::h(0), GateSpec::h(1)];
        assert_eq!(CancelSelfInverse.rewrite(&ops), ops);
    }

    #[test]
    fn single_pass_does_not_cascade() {
        let ops = vec![GateSpec::h(0), GateSpec::x(0), GateSpec::x(0), GateSpec::h(0)];
        let once = CancelSelfInverse.rewrite(&ops);
        assert_eq!(once, vec![GateSpec::h(0), GateSpec::h(0)]);
        assert!(CancelSelfInverse.rewrite(&once).is_empty());
    }

    #[test]
    fn different_axes_stay_apart() {
        let ops = vec![GateSpec::rx(0, 0.5).unwrap(), GateSpec::rz(0, 0.5).unwrap()];
        assert_eq!(MergeRotations.rewrite(&ops), ops);
    }

    #[test]
    fn reversed_cnot_pair_is_kept() {
        let ops = vec![GateSpec::cnot(0, 1).unwrap(), GateSpec::cnot(1, 0).unwrap()];
        assert_eq!(TwoQubitElimination.rewrite(&ops), ops);
    }

    #[test]
    fn cz_pair_cancels_in_either_orientation() {
        let ops = vec![GateSpec::cz(0, 1).unwrap(), GateSpec::cz(1, 0).unwrap()];
        assert!(TwoQubitElimination.rewrite(&ops).is_empty());
    }
}
