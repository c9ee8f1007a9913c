//! Vigil policy evaluator.
//!
//! The evaluator orchestrates one ordered list of rule instances against one
//! action and produces an [`EvaluationReport`]. It holds no mutable state:
//! evaluation of a single action is side-effect-free and safe to call
//! concurrently with any other evaluation, sharing only the read-only rule
//! registry.
//!
//! Two propagation modes exist. [`EvaluationMode::Strict`] aborts on the
//! first configuration or rule-execution error, for tests and CI where a
//! misconfigured policy must be caught early. [`EvaluationMode::Lenient`]
//! (the default, used for production decisions) converts either error into a
//! failed verdict and keeps evaluating the remaining rules: a broken rule
//! degrades to fail-closed rather than crashing the caller, and no action is
//! ever allowed because of an internal error.

#![deny(unsafe_code)]

pub mod error;

pub use error::EvalError;

use std::sync::Arc;

use tracing::{debug, warn};
use vigil_rules::{RuleError, RuleRegistry};
use vigil_types::{Action, EvaluationReport, Policy, RuleSpec, Verdict};

/// Error-propagation mode for one evaluator instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EvaluationMode {
    /// Propagate config/execution errors immediately, aborting evaluation.
    Strict,
    /// Convert errors into failed verdicts and continue. Production default.
    #[default]
    Lenient,
}

/// Runs a policy's enabled rules, in order, against one action.
pub struct PolicyEvaluator {
    registry: Arc<RuleRegistry>,
    mode: EvaluationMode,
}

impl PolicyEvaluator {
    /// A lenient (fail-closed) evaluator over the given registry.
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            mode: EvaluationMode::Lenient,
        }
    }

    /// A strict evaluator, for contexts where policy misconfiguration must
    /// surface as an error rather than a denial.
    pub fn strict(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            mode: EvaluationMode::Strict,
        }
    }

    pub fn with_mode(registry: Arc<RuleRegistry>, mode: EvaluationMode) -> Self {
        Self { registry, mode }
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Evaluate `action` against `policy`.
    ///
    /// Verdicts are accumulated in enabled-rule order; the report's `passed`
    /// is their logical AND. In lenient mode this never returns `Err`.
    pub fn evaluate(&self, policy: &Policy, action: &Action) -> Result<EvaluationReport, EvalError> {
        let mut verdicts = Vec::new();

        for spec in policy.enabled_rules() {
            let verdict = match self.registry.resolve(&spec.rule_type) {
                Some(rule) => match rule.check(action, &spec.parameters) {
                    Ok(check) => Verdict {
                        rule_instance_name: spec.instance_name.clone(),
                        passed: check.passed,
                        message: check.message,
                        severity: spec.severity,
                    },
                    Err(err) => self.rule_failure(spec, err)?,
                },
                None => self.unknown_rule_type(spec)?,
            };
            verdicts.push(verdict);
        }

        let report = EvaluationReport::new(policy.name.clone(), action.clone(), verdicts);
        debug!(
            policy = %policy.name,
            passed = report.passed,
            violations = report.violation_count(),
            "policy evaluated"
        );
        Ok(report)
    }

    fn unknown_rule_type(&self, spec: &RuleSpec) -> Result<Verdict, EvalError> {
        match self.mode {
            EvaluationMode::Strict => Err(EvalError::UnknownRuleType {
                rule_type: spec.rule_type.clone(),
                instance: spec.instance_name.clone(),
            }),
            EvaluationMode::Lenient => {
                warn!(
                    rule_type = %spec.rule_type,
                    instance = %spec.instance_name,
                    "unknown rule type, failing closed"
                );
                Ok(Verdict::failed(
                    spec.instance_name.clone(),
                    format!("configuration error: unknown rule type '{}'", spec.rule_type),
                    spec.severity,
                ))
            }
        }
    }

    fn rule_failure(&self, spec: &RuleSpec, err: RuleError) -> Result<Verdict, EvalError> {
        match self.mode {
            EvaluationMode::Strict => Err(EvalError::RuleFailed {
                instance: spec.instance_name.clone(),
                source: err,
            }),
            EvaluationMode::Lenient => {
                warn!(
                    instance = %spec.instance_name,
                    error = %err,
                    "rule execution error, failing closed"
                );
                Ok(Verdict::failed(
                    spec.instance_name.clone(),
                    format!("execution error: {err}"),
                    spec.severity,
                ))
            }
        }
    }
}
