//! Vigil audit ledger.
//!
//! This crate provides:
//! - [`AuditEntry`]: immutable, sequence-numbered, hash-chained records
//! - [`AuditSink`]: the narrow append/read boundary a durable store implements
//! - [`MemorySink`] and [`JsonlSink`] implementations
//! - [`AuditLedger`]: the facade owning sequencing, filtering, aggregation,
//!   and chain validation
//!
//! The append path is the one serialization point in the governance core:
//! sequence-id allocation and the durable write happen under a single mutex,
//! so ids are strictly monotonic and gap-free per ledger instance and append
//! order is externally observable as ledger order. Reads go straight to the
//! sink and never block writers beyond the sink's own isolation.

#![deny(unsafe_code)]

pub mod entry;
pub mod error;
pub mod filter;
pub mod jsonl;
pub mod memory;
pub mod traits;

pub use entry::AuditEntry;
pub use error::{LedgerError, SinkError};
pub use filter::{AuditFilter, FieldMatch};
pub use jsonl::JsonlSink;
pub use memory::MemorySink;
pub use traits::AuditSink;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::debug;
use vigil_types::{EvaluationReport, Severity};

struct AppendState {
    next_sequence_id: u64,
    prev_hash: Option<[u8; 32]>,
}

/// Append-only, strictly ordered store of evaluation outcomes.
pub struct AuditLedger {
    sink: Arc<dyn AuditSink>,
    append_state: Mutex<AppendState>,
}

impl AuditLedger {
    /// A fresh ledger over an in-memory sink.
    pub fn in_memory() -> Self {
        Self::with_sink(Arc::new(MemorySink::new()))
    }

    /// A fresh ledger over an explicit sink; sequence ids start at 1.
    pub fn with_sink(sink: Arc<dyn AuditSink>) -> Self {
        Self {
            sink,
            append_state: Mutex::new(AppendState {
                next_sequence_id: 1,
                prev_hash: None,
            }),
        }
    }

    /// Resume a ledger over a sink that already holds history, continuing
    /// the sequence and hash chain from the last persisted entry.
    pub fn resume(sink: Arc<dyn AuditSink>) -> Result<Self, LedgerError> {
        let mut entries = sink.read_all().map_err(LedgerError::Sink)?;
        entries.sort_by_key(|entry| entry.sequence_id);

        let append_state = match entries.last() {
            Some(last) => AppendState {
                next_sequence_id: last.sequence_id + 1,
                prev_hash: Some(last.entry_hash),
            },
            None => AppendState {
                next_sequence_id: 1,
                prev_hash: None,
            },
        };

        Ok(Self {
            sink,
            append_state: Mutex::new(append_state),
        })
    }

    /// Access the underlying sink.
    pub fn sink(&self) -> Arc<dyn AuditSink> {
        Arc::clone(&self.sink)
    }

    /// Append the outcome of one evaluation and return its sequence id.
    ///
    /// The id is allocated and the entry durably written under one lock;
    /// a sink failure surfaces as `LedgerError::Sink` and does not consume
    /// the id, so the sequence stays gap-free.
    pub fn append(&self, report: &EvaluationReport) -> Result<u64, LedgerError> {
        let mut state = self
            .append_state
            .lock()
            .map_err(|_| LedgerError::LockPoisoned)?;

        let sequence_id = state.next_sequence_id;
        let entry = AuditEntry::for_report(sequence_id, report, state.prev_hash)?;

        self.sink.append(&entry).map_err(LedgerError::Sink)?;

        state.next_sequence_id += 1;
        state.prev_hash = Some(entry.entry_hash);

        debug!(
            sequence_id,
            agent_id = %entry.agent_id,
            policy = %entry.policy_name,
            passed = entry.passed,
            "audit entry appended"
        );
        Ok(sequence_id)
    }

    /// Entries matching `filter`, in ascending sequence-id order.
    pub fn search_entries(&self, filter: &AuditFilter) -> Result<Vec<AuditEntry>, LedgerError> {
        let mut entries = self.sink.read_all().map_err(LedgerError::Sink)?;
        entries.sort_by_key(|entry| entry.sequence_id);
        entries.retain(|entry| filter.matches(entry));
        Ok(entries)
    }

    /// Every entry, in ledger order.
    pub fn read_all(&self) -> Result<Vec<AuditEntry>, LedgerError> {
        self.search_entries(&AuditFilter::new())
    }

    /// Count matching entries per agent.
    pub fn aggregate_by_agent(
        &self,
        filter: &AuditFilter,
    ) -> Result<BTreeMap<String, u64>, LedgerError> {
        self.aggregate_field(filter, |entry: &AuditEntry| entry.agent_id.as_str())
    }

    /// Count matching entries per action type.
    pub fn aggregate_by_action_type(
        &self,
        filter: &AuditFilter,
    ) -> Result<BTreeMap<String, u64>, LedgerError> {
        self.aggregate_field(filter, |entry: &AuditEntry| entry.action_type.as_str())
    }

    /// Count matching entries per policy.
    pub fn aggregate_by_policy(
        &self,
        filter: &AuditFilter,
    ) -> Result<BTreeMap<String, u64>, LedgerError> {
        self.aggregate_field(filter, |entry: &AuditEntry| entry.policy_name.as_str())
    }

    fn aggregate_field<F>(
        &self,
        filter: &AuditFilter,
        field: F,
    ) -> Result<BTreeMap<String, u64>, LedgerError>
    where
        F: Fn(&AuditEntry) -> &str,
    {
        let mut counts = BTreeMap::new();
        for entry in self.search_entries(filter)? {
            *counts.entry(field(&entry).to_string()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Pass/fail counts plus a severity breakdown of the failures.
    pub fn aggregate_verdicts(&self, filter: &AuditFilter) -> Result<VerdictAggregate, LedgerError> {
        let mut aggregate = VerdictAggregate::default();
        for entry in self.search_entries(filter)? {
            if entry.passed {
                aggregate.passed += 1;
            } else {
                aggregate.failed += 1;
                if let Some(severity) = entry.highest_severity {
                    *aggregate.by_severity.entry(severity).or_insert(0) += 1;
                }
            }
        }
        Ok(aggregate)
    }

    /// Validate sequence contiguity, hash-chain linkage, per-entry hashes,
    /// and timestamp monotonicity over the whole ledger.
    pub fn validate_chain(&self) -> Result<(), LedgerError> {
        let entries = self.read_all()?;
        let mut prev_hash: Option<[u8; 32]> = None;
        let mut prev_timestamp = None;

        for (index, entry) in entries.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if entry.sequence_id != expected_seq {
                return Err(LedgerError::IntegrityViolation {
                    sequence_id: entry.sequence_id,
                    reason: format!(
                        "expected sequence {expected_seq}, found {}",
                        entry.sequence_id
                    ),
                });
            }

            if entry.prev_hash != prev_hash {
                return Err(LedgerError::IntegrityViolation {
                    sequence_id: entry.sequence_id,
                    reason: "previous hash link mismatch".into(),
                });
            }

            if entry.canonical_hash()? != entry.entry_hash {
                return Err(LedgerError::IntegrityViolation {
                    sequence_id: entry.sequence_id,
                    reason: "entry hash mismatch".into(),
                });
            }

            if let Some(previous) = prev_timestamp {
                if entry.timestamp < previous {
                    return Err(LedgerError::IntegrityViolation {
                        sequence_id: entry.sequence_id,
                        reason: "timestamp regressed".into(),
                    });
                }
            }

            prev_hash = Some(entry.entry_hash);
            prev_timestamp = Some(entry.timestamp);
        }

        Ok(())
    }
}

/// Pass/fail/severity breakdown over a filtered subset of the ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictAggregate {
    pub passed: u64,
    pub failed: u64,
    pub by_severity: BTreeMap<Severity, u64>,
}
