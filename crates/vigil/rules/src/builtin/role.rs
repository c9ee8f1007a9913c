use serde::Deserialize;
use vigil_types::Action;

use crate::error::RuleError;
use crate::traits::{parse_params, ActionRule, RuleCheck, RuleParams};

fn default_role_field() -> String {
    "role".to_string()
}

#[derive(Deserialize)]
struct RoleParams {
    #[serde(default = "default_role_field")]
    role_field: String,
    allowed_roles: Vec<String>,
    /// When set, the rule only applies to actions of this type; all other
    /// action types pass vacuously.
    #[serde(default)]
    action_type: Option<String>,
}

/// Fails when the action's role field is not in the configured allow-list.
///
/// A missing role field fails: a role gate that was explicitly configured
/// has nothing to admit on.
pub struct RoleCheckRule;

impl RoleCheckRule {
    pub const RULE_TYPE: &'static str = "role_check";
}

impl ActionRule for RoleCheckRule {
    fn rule_type(&self) -> &'static str {
        Self::RULE_TYPE
    }

    fn check(&self, action: &Action, params: &RuleParams) -> Result<RuleCheck, RuleError> {
        let params: RoleParams = parse_params(params)?;

        if let Some(only_type) = &params.action_type {
            if action.action_type() != only_type {
                return Ok(RuleCheck::pass(format!(
                    "rule scoped to action type '{only_type}', not applicable"
                )));
            }
        }

        match action.get_str(&params.role_field) {
            None => Ok(RuleCheck::fail(format!(
                "required role field '{}' is missing",
                params.role_field
            ))),
            Some(role) if params.allowed_roles.iter().any(|allowed| allowed == role) => Ok(
                RuleCheck::pass(format!("role '{role}' is allow-listed")),
            ),
            Some(role) => Ok(RuleCheck::fail(format!(
                "role '{role}' is not in the allow-list"
            ))),
        }
    }
}
