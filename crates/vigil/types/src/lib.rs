//! Vigil shared data model.
//!
//! This crate defines the value types the governance core passes between its
//! components:
//! - [`Action`]: the open-schema description of one thing an agent wants to do
//! - [`Policy`] / [`RuleSpec`]: an ordered, named set of rule configurations
//! - [`Verdict`] / [`EvaluationReport`]: per-rule and aggregate outcomes
//!
//! Everything here is a plain value: `Clone + Serialize + Deserialize`, built
//! once and never mutated afterwards. The evaluator, ledger, and simulator all
//! share these types without owning any behavior beyond derived accessors.

#![deny(unsafe_code)]

pub mod action;
pub mod policy;
pub mod report;

pub use action::Action;
pub use policy::{Policy, RuleSpec};
pub use report::{EvaluationReport, Verdict};

use serde::{Deserialize, Serialize};

/// Ordinal severity attached to a rule configuration and to its verdicts.
///
/// Ordering is `Low < Medium < High < Critical`; report-level aggregation
/// takes the maximum over failed verdicts. "No severity" (a fully passing
/// report) is represented as `Option::<Severity>::None`, rendered as `none`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Render an optional severity the way audit surfaces expect it.
pub fn severity_label(severity: Option<Severity>) -> &'static str {
    severity.map(|s| s.label()).unwrap_or("none")
}
