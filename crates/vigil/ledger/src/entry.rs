use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_types::{EvaluationReport, Severity};

use crate::error::LedgerError;

/// One immutable, sequence-numbered record of an evaluation outcome.
///
/// Once appended, an entry is never mutated or deleted: the ledger is
/// write-once, read-many. `prev_hash`/`entry_hash` chain consecutive entries
/// so tampering with stored history is detectable (see
/// `AuditLedger::validate_chain`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub sequence_id: u64,
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
    pub action_type: String,
    pub policy_name: String,
    pub passed: bool,
    pub highest_severity: Option<Severity>,
    pub verdict_summary: String,
    /// The full evaluation report this entry summarizes.
    pub report: EvaluationReport,
    pub prev_hash: Option<[u8; 32]>,
    pub entry_hash: [u8; 32],
}

impl AuditEntry {
    /// Build the entry for `report` at `sequence_id`, chained onto
    /// `prev_hash`, with a capture-time timestamp.
    pub fn for_report(
        sequence_id: u64,
        report: &EvaluationReport,
        prev_hash: Option<[u8; 32]>,
    ) -> Result<Self, LedgerError> {
        let mut entry = Self {
            sequence_id,
            timestamp: Utc::now(),
            agent_id: report.action.agent_id().to_string(),
            action_type: report.action.action_type().to_string(),
            policy_name: report.policy_name.clone(),
            passed: report.passed,
            highest_severity: report.highest_severity(),
            verdict_summary: report.summary(),
            report: report.clone(),
            prev_hash,
            entry_hash: [0; 32],
        };
        entry.entry_hash = entry.canonical_hash()?;
        Ok(entry)
    }

    /// Recompute this entry's hash over its canonical form (own hash zeroed).
    pub fn canonical_hash(&self) -> Result<[u8; 32], LedgerError> {
        let mut canonical = self.clone();
        canonical.entry_hash = [0; 32];

        let encoded = serde_json::to_vec(&canonical)
            .map_err(|error| LedgerError::Serialization(error.to_string()))?;

        let mut hasher = blake3::Hasher::new();
        hasher.update(b"vigil-audit-entry-v1:");
        hasher.update(&encoded);
        Ok(*hasher.finalize().as_bytes())
    }
}
