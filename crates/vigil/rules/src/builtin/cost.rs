use serde::Deserialize;
use vigil_types::Action;

use crate::error::RuleError;
use crate::traits::{parse_params, ActionRule, RuleCheck, RuleParams};

fn default_cost_field() -> String {
    "cost".to_string()
}

#[derive(Deserialize)]
struct CostParams {
    #[serde(default = "default_cost_field")]
    cost_field: String,
    max_cost: f64,
}

/// Fails when the action's numeric cost field exceeds the configured ceiling.
///
/// A missing (or non-numeric) cost field PASSES: absence is not a violation.
/// This is a documented policy choice; uncosted actions are governed by
/// other rules, not silently priced at infinity.
pub struct CostLimitRule;

impl CostLimitRule {
    pub const RULE_TYPE: &'static str = "cost_limit";
}

impl ActionRule for CostLimitRule {
    fn rule_type(&self) -> &'static str {
        Self::RULE_TYPE
    }

    fn check(&self, action: &Action, params: &RuleParams) -> Result<RuleCheck, RuleError> {
        let params: CostParams = parse_params(params)?;

        match action.get_f64(&params.cost_field) {
            None => Ok(RuleCheck::pass(format!(
                "no numeric '{}' field on action",
                params.cost_field
            ))),
            Some(cost) if cost > params.max_cost => Ok(RuleCheck::fail(format!(
                "cost {:.2} exceeds limit {:.2}",
                cost, params.max_cost
            ))),
            Some(cost) => Ok(RuleCheck::pass(format!(
                "cost {:.2} within limit {:.2}",
                cost, params.max_cost
            ))),
        }
    }
}
