use serde::Deserialize;
use vigil_types::Action;

use crate::error::RuleError;
use crate::traits::{parse_params, ActionRule, RuleCheck, RuleParams};

#[derive(Deserialize)]
struct KeywordParams {
    #[serde(default)]
    keywords: Vec<String>,
}

/// Fails when any configured keyword appears (case-insensitive substring) in
/// any string-valued field of the action, nested fields included.
///
/// The failure message names the first matched keyword and the field path,
/// in field order.
pub struct KeywordBlockRule;

impl KeywordBlockRule {
    pub const RULE_TYPE: &'static str = "keyword_block";
}

impl ActionRule for KeywordBlockRule {
    fn rule_type(&self) -> &'static str {
        Self::RULE_TYPE
    }

    fn check(&self, action: &Action, params: &RuleParams) -> Result<RuleCheck, RuleError> {
        let params: KeywordParams = parse_params(params)?;
        let keywords: Vec<String> = params
            .keywords
            .iter()
            .map(|keyword| keyword.to_lowercase())
            .collect();

        if keywords.is_empty() {
            return Ok(RuleCheck::pass("no keywords configured"));
        }

        for (path, text) in action.string_fields() {
            let haystack = text.to_lowercase();
            if let Some(keyword) = keywords.iter().find(|keyword| haystack.contains(*keyword)) {
                return Ok(RuleCheck::fail(format!(
                    "blocked keyword '{keyword}' found in field '{path}'"
                )));
            }
        }

        Ok(RuleCheck::pass("no blocked keywords found"))
    }
}
