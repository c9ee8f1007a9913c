use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Severity;

/// One configured use of a rule type within a policy.
///
/// `instance_name` distinguishes multiple uses of the same `rule_type` in one
/// policy (e.g. two cost ceilings over different fields). `rule_type` must
/// resolve in the rule registry at evaluation time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuleSpec {
    pub instance_name: String,
    pub rule_type: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub severity: Severity,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

impl RuleSpec {
    pub fn new(
        instance_name: impl Into<String>,
        rule_type: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            instance_name: instance_name.into(),
            rule_type: rule_type.into(),
            enabled: true,
            severity,
            parameters: Map::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// An ordered, named set of rule configurations applied to actions.
///
/// Policies are treated as immutable once constructed: the evaluator and the
/// simulator only ever borrow them, and nothing in this crate mutates a policy
/// after `new`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Policy {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    pub rules: Vec<RuleSpec>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Policy {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            rules: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_rule(mut self, rule: RuleSpec) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The evaluation-order-preserving sub-list of enabled rules.
    pub fn enabled_rules(&self) -> impl Iterator<Item = &RuleSpec> {
        self.rules.iter().filter(|rule| rule.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn enabled_rules_preserves_order_and_skips_disabled() {
        let policy = Policy::new("baseline", "1.0.0")
            .with_rule(RuleSpec::new("first", "keyword_block", Severity::High))
            .with_rule(RuleSpec::new("off", "pii_check", Severity::Critical).disabled())
            .with_rule(RuleSpec::new("second", "cost_limit", Severity::Medium));

        let names: Vec<&str> = policy
            .enabled_rules()
            .map(|rule| rule.instance_name.as_str())
            .collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn rule_spec_deserializes_with_defaults() {
        let spec: RuleSpec = serde_json::from_value(json!({
            "instance_name": "cost-cap",
            "rule_type": "cost_limit",
            "severity": "medium"
        }))
        .unwrap();

        assert!(spec.enabled);
        assert!(spec.parameters.is_empty());
        assert_eq!(spec.severity, Severity::Medium);
    }

    #[test]
    fn policy_round_trips_through_json() {
        let policy = Policy::new("prod-guard", "2.1.0")
            .with_description("production guardrails")
            .with_rule(
                RuleSpec::new("cost-cap", "cost_limit", Severity::High)
                    .with_param("max_cost", json!(100.0)),
            )
            .with_metadata("owner", "governance-team");

        let encoded = serde_json::to_string(&policy).unwrap();
        let decoded: Policy = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.name, "prod-guard");
        assert_eq!(decoded.rules.len(), 1);
        assert_eq!(decoded.rules[0].parameters["max_cost"], json!(100.0));
        assert_eq!(decoded.metadata["owner"], "governance-team");
    }
}
