use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use vigil_types::Action;

use crate::error::RuleError;
use crate::traits::{parse_params, ActionRule, RuleCheck, RuleParams};

/// PII categories the rule can scan for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Email,
    Ssn,
    Phone,
    CreditCard,
}

impl PiiCategory {
    const ALL: [PiiCategory; 4] = [
        PiiCategory::Email,
        PiiCategory::Ssn,
        PiiCategory::Phone,
        PiiCategory::CreditCard,
    ];

    fn label(&self) -> &'static str {
        match self {
            PiiCategory::Email => "email",
            PiiCategory::Ssn => "ssn",
            PiiCategory::Phone => "phone",
            PiiCategory::CreditCard => "credit_card",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            PiiCategory::Email => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}")
                        .expect("hard-coded email pattern must compile")
                })
            }
            PiiCategory::Ssn => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r"\b\d{3}-\d{2}-\d{4}\b")
                        .expect("hard-coded ssn pattern must compile")
                })
            }
            PiiCategory::Phone => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r"\b(?:\+?1[-. ]?)?\(?\d{3}\)?[-. ]\d{3}[-. ]\d{4}\b")
                        .expect("hard-coded phone pattern must compile")
                })
            }
            PiiCategory::CreditCard => {
                static RE: OnceLock<Regex> = OnceLock::new();
                RE.get_or_init(|| {
                    Regex::new(r"\b\d{4}[- ]?\d{4}[- ]?\d{4}[- ]?\d{4}\b")
                        .expect("hard-coded credit card pattern must compile")
                })
            }
        }
    }
}

#[derive(Deserialize)]
struct PiiParams {
    /// Categories to scan; all four when omitted.
    #[serde(default)]
    categories: Option<Vec<PiiCategory>>,
}

/// Fails when a configured PII category matches any string field.
///
/// The failure message carries only the category and the field path, never
/// the matched substring, so detected PII cannot leak into audit messages.
pub struct PiiCheckRule;

impl PiiCheckRule {
    pub const RULE_TYPE: &'static str = "pii_check";
}

impl ActionRule for PiiCheckRule {
    fn rule_type(&self) -> &'static str {
        Self::RULE_TYPE
    }

    fn check(&self, action: &Action, params: &RuleParams) -> Result<RuleCheck, RuleError> {
        let params: PiiParams = parse_params(params)?;
        let categories = params
            .categories
            .unwrap_or_else(|| PiiCategory::ALL.to_vec());

        for (path, text) in action.string_fields() {
            for category in &categories {
                if category.pattern().is_match(text) {
                    return Ok(RuleCheck::fail(format!(
                        "pii category '{}' detected in field '{path}'",
                        category.label()
                    )));
                }
            }
        }

        Ok(RuleCheck::pass("no pii detected"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> RuleParams {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("params fixture must be an object"),
        }
    }

    fn action(value: serde_json::Value) -> Action {
        Action::from_value(value).unwrap()
    }

    #[test]
    fn detects_each_category() {
        let cases = [
            ("contact alice@example.com now", "email"),
            ("ssn is 123-45-6789", "ssn"),
            ("call 555-867-5309 today", "phone"),
            ("card 4111-1111-1111-1111 on file", "credit_card"),
        ];

        for (text, expected) in cases {
            let check = PiiCheckRule
                .check(&action(json!({"body": text})), &params(json!({})))
                .unwrap();
            assert!(!check.passed, "expected {expected} to match in {text:?}");
            assert!(check.message.contains(expected), "message: {}", check.message);
        }
    }

    #[test]
    fn message_never_contains_the_matched_value() {
        let check = PiiCheckRule
            .check(
                &action(json!({"body": "reach me at secret.address@example.com"})),
                &params(json!({})),
            )
            .unwrap();
        assert!(!check.passed);
        assert!(!check.message.contains("secret.address"));
        assert!(check.message.contains("body"));
    }

    #[test]
    fn category_filter_narrows_the_scan() {
        let ssn_action = action(json!({"note": "ssn 123-45-6789"}));

        let email_only = PiiCheckRule
            .check(&ssn_action, &params(json!({"categories": ["email"]})))
            .unwrap();
        assert!(email_only.passed);

        let ssn_only = PiiCheckRule
            .check(&ssn_action, &params(json!({"categories": ["ssn"]})))
            .unwrap();
        assert!(!ssn_only.passed);
    }

    #[test]
    fn unknown_category_is_an_invalid_params_error() {
        let result = PiiCheckRule.check(
            &action(json!({"body": "x"})),
            &params(json!({"categories": ["dna"]})),
        );
        assert!(matches!(result, Err(RuleError::InvalidParams(_))));
    }

    #[test]
    fn clean_text_passes() {
        let check = PiiCheckRule
            .check(
                &action(json!({"body": "the meeting moved to room four"})),
                &params(json!({})),
            )
            .unwrap();
        assert!(check.passed);
    }

    #[test]
    fn scans_nested_fields() {
        let check = PiiCheckRule
            .check(
                &action(json!({"payload": {"to": "bob@example.com"}})),
                &params(json!({})),
            )
            .unwrap();
        assert!(!check.passed);
        assert!(check.message.contains("payload.to"));
    }
}
