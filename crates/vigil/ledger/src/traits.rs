use crate::entry::AuditEntry;
use crate::error::SinkError;

/// The pluggable durable store behind the audit ledger.
///
/// The ledger owns sequencing and hash-chaining; a sink only persists the
/// finished entry and reads history back. Implementations may be a file, a
/// key-value store, or a remote service. Any blocking or retry policy lives
/// behind this boundary, but failures must surface synchronously through the
/// returned `Result`, never be retried silently.
pub trait AuditSink: Send + Sync {
    /// Persist one entry. The ledger calls this under its append lock, so
    /// implementations see entries in sequence order.
    fn append(&self, entry: &AuditEntry) -> Result<(), SinkError>;

    /// Read every persisted entry. Order does not need to be guaranteed by
    /// the sink; the ledger sorts by sequence id on the read path.
    fn read_all(&self) -> Result<Vec<AuditEntry>, SinkError>;
}
