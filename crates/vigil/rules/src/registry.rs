use std::collections::HashMap;

use crate::builtin::{CostLimitRule, KeywordBlockRule, PiiCheckRule, RoleCheckRule};
use crate::error::RegistryError;
use crate::traits::ActionRule;

/// Constructor for one rule type.
pub type RuleConstructor = Box<dyn Fn() -> Box<dyn ActionRule> + Send + Sync>;

/// Explicit `rule_type` tag → constructor mapping.
///
/// Lifecycle: built-ins are seeded at construction; third-party rules are
/// registered before the registry is shared with a running evaluator.
/// `register` takes `&mut self`, so once the registry sits behind an `Arc`
/// it is read-only and safe to resolve from any number of threads.
pub struct RuleRegistry {
    constructors: HashMap<String, RuleConstructor>,
}

impl RuleRegistry {
    /// An empty registry, for callers that want full control over the
    /// capability set.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// A registry seeded with the four built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.seed(
            KeywordBlockRule::RULE_TYPE,
            Box::new(|| Box::new(KeywordBlockRule) as Box<dyn ActionRule>),
        );
        registry.seed(
            PiiCheckRule::RULE_TYPE,
            Box::new(|| Box::new(PiiCheckRule) as Box<dyn ActionRule>),
        );
        registry.seed(
            CostLimitRule::RULE_TYPE,
            Box::new(|| Box::new(CostLimitRule) as Box<dyn ActionRule>),
        );
        registry.seed(
            RoleCheckRule::RULE_TYPE,
            Box::new(|| Box::new(RoleCheckRule) as Box<dyn ActionRule>),
        );
        registry
    }

    fn seed(&mut self, rule_type: &'static str, constructor: RuleConstructor) {
        // seeding a fresh registry cannot collide
        self.register(rule_type, constructor)
            .unwrap_or_else(|_| unreachable!("built-in rule types are distinct"));
    }

    /// Register a rule constructor under its type tag.
    ///
    /// Duplicate registrations are rejected, never overwritten.
    pub fn register(
        &mut self,
        rule_type: impl Into<String>,
        constructor: RuleConstructor,
    ) -> Result<(), RegistryError> {
        let rule_type = rule_type.into();
        if self.constructors.contains_key(&rule_type) {
            return Err(RegistryError::DuplicateRuleType(rule_type));
        }
        self.constructors.insert(rule_type, constructor);
        Ok(())
    }

    /// Instantiate the rule registered under `rule_type`, if any.
    pub fn resolve(&self, rule_type: &str) -> Option<Box<dyn ActionRule>> {
        self.constructors.get(rule_type).map(|ctor| ctor())
    }

    pub fn contains(&self, rule_type: &str) -> bool {
        self.constructors.contains_key(rule_type)
    }

    /// Registered type tags, sorted for stable display.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{RuleCheck, RuleParams};
    use vigil_types::Action;

    struct AlwaysDeny;

    impl ActionRule for AlwaysDeny {
        fn rule_type(&self) -> &'static str {
            "always_deny"
        }

        fn check(&self, _: &Action, _: &RuleParams) -> Result<RuleCheck, crate::RuleError> {
            Ok(RuleCheck::fail("denied by fixture"))
        }
    }

    #[test]
    fn builtins_are_seeded() {
        let registry = RuleRegistry::with_builtins();
        assert_eq!(
            registry.registered_types(),
            ["cost_limit", "keyword_block", "pii_check", "role_check"]
        );
        assert!(registry.resolve("cost_limit").is_some());
        assert!(registry.resolve("no_such_rule").is_none());
    }

    #[test]
    fn third_party_rules_can_register() {
        let mut registry = RuleRegistry::with_builtins();
        registry
            .register(
                "always_deny",
                Box::new(|| Box::new(AlwaysDeny) as Box<dyn ActionRule>),
            )
            .unwrap();

        let rule = registry.resolve("always_deny").unwrap();
        let check = rule.check(&Action::new(), &RuleParams::new()).unwrap();
        assert!(!check.passed);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = RuleRegistry::with_builtins();
        let err = registry
            .register(
                "cost_limit",
                Box::new(|| Box::new(AlwaysDeny) as Box<dyn ActionRule>),
            )
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateRuleType(name) if name == "cost_limit"));

        // the original rule is still the one resolved
        assert_eq!(
            registry.resolve("cost_limit").unwrap().rule_type(),
            "cost_limit"
        );
    }
}
