use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{severity_label, Action, Severity};

/// One rule's pass/fail outcome for one action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub rule_instance_name: String,
    pub passed: bool,
    pub message: String,
    pub severity: Severity,
}

impl Verdict {
    pub fn passed(
        rule_instance_name: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            rule_instance_name: rule_instance_name.into(),
            passed: true,
            message: message.into(),
            severity,
        }
    }

    pub fn failed(
        rule_instance_name: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            rule_instance_name: rule_instance_name.into(),
            passed: false,
            message: message.into(),
            severity,
        }
    }
}

/// The aggregate outcome of all verdicts for one (policy, action) pair.
///
/// `passed` is a pure function of the verdicts (logical AND); there is no
/// override path. Verdict order equals the policy's enabled-rule order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub policy_name: String,
    pub action: Action,
    pub verdicts: Vec<Verdict>,
    pub passed: bool,
    pub evaluated_at: DateTime<Utc>,
}

impl EvaluationReport {
    /// Assemble a report from ordered verdicts, computing `passed` and
    /// stamping the evaluation time.
    pub fn new(policy_name: impl Into<String>, action: Action, verdicts: Vec<Verdict>) -> Self {
        let passed = verdicts.iter().all(|verdict| verdict.passed);
        Self {
            policy_name: policy_name.into(),
            action,
            verdicts,
            passed,
            evaluated_at: Utc::now(),
        }
    }

    pub fn failed_verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.verdicts.iter().filter(|verdict| !verdict.passed)
    }

    pub fn violation_count(&self) -> usize {
        self.failed_verdicts().count()
    }

    /// Maximum severity across failed verdicts; `None` iff every rule passed.
    /// Ties at the top severity report that severity value.
    pub fn highest_severity(&self) -> Option<Severity> {
        self.failed_verdicts().map(|verdict| verdict.severity).max()
    }

    /// One-line summary for audit surfaces, e.g.
    /// `"3 rules, 1 violation, highest severity high"`.
    pub fn summary(&self) -> String {
        format!(
            "{} rules, {} violations, highest severity {}",
            self.verdicts.len(),
            self.violation_count(),
            severity_label(self.highest_severity()),
        )
    }
}
