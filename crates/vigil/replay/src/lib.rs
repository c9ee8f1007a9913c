//! Vigil trace simulator.
//!
//! Replays previously recorded (action, original-verdict) pairs through a
//! candidate policy and reports the delta against what actually happened,
//! so a policy change can be risk-assessed before deployment.
//!
//! The simulator never mutates the ledger or the trace: it is a pure
//! read-and-recompute pass, and with the evaluator's purity the same trace
//! and candidate policy always yield an identical report.

#![deny(unsafe_code)]

pub mod error;

pub use error::ReplayError;

use serde::{Deserialize, Serialize};
use tracing::debug;
use vigil_ledger::AuditEntry;
use vigil_policy::PolicyEvaluator;
use vigil_types::{Action, Policy, Severity};

/// One historical decision, reconstructed from a ledger entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub sequence_id: u64,
    pub action: Action,
    /// Name of the policy originally applied.
    pub policy_name: String,
    /// The originally recorded aggregate verdict.
    pub original_passed: bool,
}

/// An ordered sequence of historical decisions; replay order equals ledger
/// append order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new(mut events: Vec<TraceEvent>) -> Self {
        events.sort_by_key(|event| event.sequence_id);
        Self { events }
    }

    /// Reconstruct a trace from ledger entries (e.g. a `search_entries`
    /// result), preserving ledger order.
    pub fn from_entries(entries: &[AuditEntry]) -> Self {
        Self::new(
            entries
                .iter()
                .map(|entry| TraceEvent {
                    sequence_id: entry.sequence_id,
                    action: entry.report.action.clone(),
                    policy_name: entry.policy_name.clone(),
                    original_passed: entry.passed,
                })
                .collect(),
        )
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// How one event's outcome changed under the candidate policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeDelta {
    /// Candidate agrees with the recorded outcome.
    Unchanged,
    /// Originally allowed, candidate blocks.
    NewlyBlocked,
    /// Originally blocked, candidate allows.
    NewlyAllowed,
}

/// Per-event classification with the candidate outcome attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventDelta {
    pub sequence_id: u64,
    pub delta: OutcomeDelta,
    pub original_passed: bool,
    pub candidate_passed: bool,
    pub candidate_violations: usize,
    pub candidate_highest_severity: Option<Severity>,
}

/// The outcome of replaying one trace against one candidate policy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub candidate_policy_name: String,
    pub deltas: Vec<EventDelta>,
}

impl SimulationReport {
    pub fn unchanged_count(&self) -> usize {
        self.count(OutcomeDelta::Unchanged)
    }

    pub fn newly_blocked_count(&self) -> usize {
        self.count(OutcomeDelta::NewlyBlocked)
    }

    pub fn newly_allowed_count(&self) -> usize {
        self.count(OutcomeDelta::NewlyAllowed)
    }

    /// Signed risk delta: newly allowed minus newly blocked. Negative means
    /// the candidate policy is net safer than the recorded history.
    pub fn risk_delta(&self) -> i64 {
        self.newly_allowed_count() as i64 - self.newly_blocked_count() as i64
    }

    fn count(&self, delta: OutcomeDelta) -> usize {
        self.deltas.iter().filter(|event| event.delta == delta).count()
    }
}

/// Replays traces through a policy evaluator.
pub struct TraceSimulator {
    evaluator: PolicyEvaluator,
}

impl TraceSimulator {
    /// Wrap an evaluator. Lenient mode is the recommended configuration:
    /// a candidate policy with a broken rule still produces a fail-closed
    /// simulation instead of aborting the replay.
    pub fn new(evaluator: PolicyEvaluator) -> Self {
        Self { evaluator }
    }

    /// Re-evaluate every trace event against `candidate`, in ledger order,
    /// and classify each outcome against the recorded one.
    pub fn replay(
        &self,
        trace: &Trace,
        candidate: &Policy,
    ) -> Result<SimulationReport, ReplayError> {
        let mut deltas = Vec::with_capacity(trace.len());

        for event in trace.events() {
            let report = self
                .evaluator
                .evaluate(candidate, &event.action)
                .map_err(|source| ReplayError::Evaluation {
                    sequence_id: event.sequence_id,
                    source,
                })?;

            let delta = match (event.original_passed, report.passed) {
                (true, false) => OutcomeDelta::NewlyBlocked,
                (false, true) => OutcomeDelta::NewlyAllowed,
                _ => OutcomeDelta::Unchanged,
            };

            deltas.push(EventDelta {
                sequence_id: event.sequence_id,
                delta,
                original_passed: event.original_passed,
                candidate_passed: report.passed,
                candidate_violations: report.violation_count(),
                candidate_highest_severity: report.highest_severity(),
            });
        }

        let report = SimulationReport {
            candidate_policy_name: candidate.name.clone(),
            deltas,
        };
        debug!(
            candidate = %report.candidate_policy_name,
            events = trace.len(),
            newly_blocked = report.newly_blocked_count(),
            newly_allowed = report.newly_allowed_count(),
            risk_delta = report.risk_delta(),
            "trace replayed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use vigil_policy::PolicyEvaluator;
    use vigil_rules::RuleRegistry;
    use vigil_types::RuleSpec;

    fn action(role: &str) -> Action {
        Action::from_value(json!({
            "agent_id": "agent-1",
            "action_type": "query",
            "role": role,
        }))
        .unwrap()
    }

    fn role_policy(name: &str, allowed: &[&str]) -> Policy {
        Policy::new(name, "1.0.0").with_rule(
            RuleSpec::new("role-gate", "role_check", Severity::High)
                .with_param("allowed_roles", json!(allowed)),
        )
    }

    fn event(sequence_id: u64, role: &str, original_passed: bool) -> TraceEvent {
        TraceEvent {
            sequence_id,
            action: action(role),
            policy_name: "original".into(),
            original_passed,
        }
    }

    fn simulator() -> TraceSimulator {
        TraceSimulator::new(PolicyEvaluator::new(Arc::new(RuleRegistry::with_builtins())))
    }

    #[test]
    fn tightened_policy_classifies_newly_blocked() {
        // history: viewer actions were allowed
        let trace = Trace::new(vec![event(1, "viewer", true)]);
        // candidate: viewers are no longer allow-listed
        let candidate = role_policy("tightened", &["admin"]);

        let report = simulator().replay(&trace, &candidate).unwrap();
        assert_eq!(report.deltas.len(), 1);
        assert_eq!(report.deltas[0].delta, OutcomeDelta::NewlyBlocked);
        assert_eq!(report.newly_blocked_count(), 1);
        assert_eq!(report.risk_delta(), -1);
    }

    #[test]
    fn loosened_policy_classifies_newly_allowed() {
        let trace = Trace::new(vec![event(1, "viewer", false)]);
        let candidate = role_policy("loosened", &["admin", "viewer"]);

        let report = simulator().replay(&trace, &candidate).unwrap();
        assert_eq!(report.deltas[0].delta, OutcomeDelta::NewlyAllowed);
        assert_eq!(report.risk_delta(), 1);
    }

    #[test]
    fn replaying_the_original_policy_is_all_unchanged() {
        let original = role_policy("original", &["viewer", "admin"]);
        let trace = Trace::new(vec![
            event(1, "viewer", true),
            event(2, "admin", true),
            event(3, "intern", false),
        ]);

        let report = simulator().replay(&trace, &original).unwrap();
        assert_eq!(report.unchanged_count(), 3);
        assert_eq!(report.risk_delta(), 0);
    }

    #[test]
    fn replay_is_deterministic() {
        let trace = Trace::new(vec![
            event(1, "viewer", true),
            event(2, "intern", false),
        ]);
        let candidate = role_policy("candidate", &["admin"]);

        let sim = simulator();
        let first = sim.replay(&trace, &candidate).unwrap();
        let second = sim.replay(&trace, &candidate).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn trace_events_replay_in_ledger_order() {
        // constructed out of order; Trace::new restores ledger order
        let trace = Trace::new(vec![
            event(3, "a", true),
            event(1, "b", true),
            event(2, "c", true),
        ]);

        let ids: Vec<u64> = trace.events().iter().map(|e| e.sequence_id).collect();
        assert_eq!(ids, [1, 2, 3]);

        let report = simulator()
            .replay(&trace, &role_policy("candidate", &["admin"]))
            .unwrap();
        let delta_ids: Vec<u64> = report.deltas.iter().map(|d| d.sequence_id).collect();
        assert_eq!(delta_ids, [1, 2, 3]);
    }

    #[test]
    fn strict_mode_surfaces_the_failing_sequence_id() {
        let strict = TraceSimulator::new(PolicyEvaluator::strict(Arc::new(
            RuleRegistry::with_builtins(),
        )));
        let trace = Trace::new(vec![event(7, "viewer", true)]);
        let broken = Policy::new("broken", "1.0.0")
            .with_rule(RuleSpec::new("ghost", "no_such_rule", Severity::Low));

        let err = strict.replay(&trace, &broken).unwrap_err();
        assert!(matches!(err, ReplayError::Evaluation { sequence_id: 7, .. }));
    }

    #[test]
    fn empty_trace_replays_to_an_empty_report() {
        let report = simulator()
            .replay(&Trace::default(), &role_policy("candidate", &["admin"]))
            .unwrap();
        assert!(report.deltas.is_empty());
        assert_eq!(report.risk_delta(), 0);
    }
}
