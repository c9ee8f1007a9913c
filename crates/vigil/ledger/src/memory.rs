use std::sync::RwLock;

use crate::entry::AuditEntry;
use crate::error::SinkError;
use crate::traits::AuditSink;

/// In-memory sink for tests, demos, and embedding.
#[derive(Default)]
pub struct MemorySink {
    entries: RwLock<Vec<AuditEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(test)]
    pub(crate) fn tamper<F: FnOnce(&mut Vec<AuditEntry>)>(&self, mutate: F) {
        let mut entries = self.entries.write().unwrap();
        mutate(&mut entries);
    }
}

impl AuditSink for MemorySink {
    fn append(&self, entry: &AuditEntry) -> Result<(), SinkError> {
        let mut entries = self.entries.write().map_err(|_| SinkError::LockPoisoned)?;
        entries.push(entry.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<AuditEntry>, SinkError> {
        let entries = self.entries.read().map_err(|_| SinkError::LockPoisoned)?;
        Ok(entries.clone())
    }
}
