use thiserror::Error;

/// Errors a rule implementation can raise while checking one action.
#[derive(Debug, Error)]
pub enum RuleError {
    #[error("invalid rule parameters: {0}")]
    InvalidParams(String),

    #[error("missing required action field: {0}")]
    MissingField(String),

    #[error("rule execution failed: {0}")]
    Execution(String),
}

/// Errors from the rule registry surface.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Duplicate registrations are rejected rather than overwritten, so a
    /// later plugin can never silently shadow an earlier rule type.
    #[error("rule type already registered: {0}")]
    DuplicateRuleType(String),
}
