use thiserror::Error;
use vigil_policy::EvalError;

/// Errors raised while replaying a trace.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Strict-mode evaluation failed for the event at `sequence_id`.
    #[error("evaluation failed for trace event {sequence_id}")]
    Evaluation {
        sequence_id: u64,
        #[source]
        source: EvalError,
    },
}
