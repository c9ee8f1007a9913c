use chrono::{DateTime, Utc};

use crate::entry::AuditEntry;

/// Match mode for one string field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldMatch {
    Equals(String),
    Contains(String),
}

impl FieldMatch {
    fn matches(&self, value: &str) -> bool {
        match self {
            FieldMatch::Equals(expected) => value == expected,
            FieldMatch::Contains(fragment) => value.contains(fragment.as_str()),
        }
    }
}

/// Composable conjunction of predicates over audit entries.
///
/// Every configured clause must hold for an entry to match; an empty filter
/// matches everything.
#[derive(Clone, Debug, Default)]
pub struct AuditFilter {
    pub agent_id: Option<FieldMatch>,
    pub action_type: Option<FieldMatch>,
    pub policy_name: Option<FieldMatch>,
    pub passed: Option<bool>,
    /// Closed interval over the capture-time timestamp.
    pub time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Closed interval over sequence ids.
    pub sequence_range: Option<(u64, u64)>,
}

impl AuditFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agent(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(FieldMatch::Equals(agent_id.into()));
        self
    }

    pub fn with_agent_containing(mut self, fragment: impl Into<String>) -> Self {
        self.agent_id = Some(FieldMatch::Contains(fragment.into()));
        self
    }

    pub fn with_action_type(mut self, action_type: impl Into<String>) -> Self {
        self.action_type = Some(FieldMatch::Equals(action_type.into()));
        self
    }

    pub fn with_action_type_containing(mut self, fragment: impl Into<String>) -> Self {
        self.action_type = Some(FieldMatch::Contains(fragment.into()));
        self
    }

    pub fn with_policy(mut self, policy_name: impl Into<String>) -> Self {
        self.policy_name = Some(FieldMatch::Equals(policy_name.into()));
        self
    }

    pub fn with_policy_containing(mut self, fragment: impl Into<String>) -> Self {
        self.policy_name = Some(FieldMatch::Contains(fragment.into()));
        self
    }

    pub fn with_passed(mut self, passed: bool) -> Self {
        self.passed = Some(passed);
        self
    }

    pub fn with_time_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.time_range = Some((from, to));
        self
    }

    pub fn with_sequence_range(mut self, from: u64, to: u64) -> Self {
        self.sequence_range = Some((from, to));
        self
    }

    /// Check whether one entry satisfies every configured clause.
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(ref clause) = self.agent_id {
            if !clause.matches(&entry.agent_id) {
                return false;
            }
        }

        if let Some(ref clause) = self.action_type {
            if !clause.matches(&entry.action_type) {
                return false;
            }
        }

        if let Some(ref clause) = self.policy_name {
            if !clause.matches(&entry.policy_name) {
                return false;
            }
        }

        if let Some(passed) = self.passed {
            if entry.passed != passed {
                return false;
            }
        }

        if let Some((from, to)) = self.time_range {
            if entry.timestamp < from || entry.timestamp > to {
                return false;
            }
        }

        if let Some((from, to)) = self.sequence_range {
            if entry.sequence_id < from || entry.sequence_id > to {
                return false;
            }
        }

        true
    }
}
