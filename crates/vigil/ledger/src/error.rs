use thiserror::Error;

/// Errors from a pluggable audit sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("sink serialization error: {0}")]
    Serialization(String),

    #[error("sink lock poisoned")]
    LockPoisoned,
}

/// Errors from the audit ledger facade.
///
/// Append failures are always surfaced to the caller; the ledger never
/// swallows a write error.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("audit sink failure")]
    Sink(#[from] SinkError),

    #[error("entry serialization error: {0}")]
    Serialization(String),

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("ledger integrity violation at sequence {sequence_id}: {reason}")]
    IntegrityViolation { sequence_id: u64, reason: String },
}
