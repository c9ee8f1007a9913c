use thiserror::Error;
use vigil_rules::RuleError;

/// Errors raised by strict-mode evaluation.
///
/// Lenient mode never returns these; it degrades each failure into a failed
/// verdict instead.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The policy references a rule type nothing has registered.
    #[error("unknown rule type '{rule_type}' for rule instance '{instance}'")]
    UnknownRuleType { rule_type: String, instance: String },

    /// A rule implementation raised while evaluating.
    #[error("rule instance '{instance}' failed to execute")]
    RuleFailed {
        instance: String,
        #[source]
        source: RuleError,
    },
}
