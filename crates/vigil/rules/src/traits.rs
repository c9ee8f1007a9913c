use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use vigil_types::Action;

use crate::error::RuleError;

/// Per-instance rule configuration, as carried by a `RuleSpec`.
pub type RuleParams = Map<String, Value>;

/// A rule's raw outcome for one action.
///
/// Instance name and severity are attached by the evaluator from the spec;
/// the rule itself only decides pass/fail and explains why.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleCheck {
    pub passed: bool,
    pub message: String,
}

impl RuleCheck {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// The capability every governance predicate implements.
///
/// `check` MUST be a pure function of its two inputs: no network or
/// filesystem access and no shared mutable state across calls. Any type
/// conforming to this contract qualifies for registration; there is no
/// inheritance hierarchy.
pub trait ActionRule: Send + Sync {
    /// The tag this rule registers under (e.g. `"cost_limit"`).
    fn rule_type(&self) -> &'static str;

    /// Evaluate one action against this rule's parameters.
    fn check(&self, action: &Action, params: &RuleParams) -> Result<RuleCheck, RuleError>;
}

/// Deserialize a rule's typed parameter struct out of the open spec map.
pub fn parse_params<T: DeserializeOwned>(params: &RuleParams) -> Result<T, RuleError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|err| RuleError::InvalidParams(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct DemoParams {
        ceiling: f64,
        #[serde(default)]
        field: Option<String>,
    }

    #[test]
    fn parse_params_reads_typed_fields() {
        let mut params = RuleParams::new();
        params.insert("ceiling".into(), json!(10.5));
        let parsed: DemoParams = parse_params(&params).unwrap();
        assert_eq!(parsed.ceiling, 10.5);
        assert_eq!(parsed.field, None);
    }

    #[test]
    fn parse_params_rejects_wrong_types() {
        let mut params = RuleParams::new();
        params.insert("ceiling".into(), json!("not a number"));
        let result: Result<DemoParams, _> = parse_params(&params);
        assert!(matches!(result, Err(RuleError::InvalidParams(_))));
    }
}
