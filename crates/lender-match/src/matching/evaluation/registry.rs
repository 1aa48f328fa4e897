use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::super::domain::Application;
use super::super::rule_set::{RuleValue, RuleValueError};
use super::predicates;

/// Result of checking one rule against an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleCheck {
    Passed,
    Failed { reason: String },
}

impl RuleCheck {
    pub fn failed(reason: impl Into<String>) -> Self {
        RuleCheck::Failed {
            reason: reason.into(),
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, RuleCheck::Passed)
    }
}

/// A predicate bound to a rule identifier.
///
/// An `Err` means the rule value did not carry the variant the predicate reads.
pub trait RulePredicate: Send + Sync {
    fn check(&self, application: &Application, value: &RuleValue)
        -> Result<RuleCheck, RuleValueError>;
}

impl<F> RulePredicate for F
where
    F: Fn(&Application, &RuleValue) -> Result<RuleCheck, RuleValueError> + Send + Sync,
{
    fn check(
        &self,
        application: &Application,
        value: &RuleValue,
    ) -> Result<RuleCheck, RuleValueError> {
        self(application, value)
    }
}

/// Rule kinds every lender catalog can use out of the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardRule {
    MinFico,
    MinTibYears,
    MinRevenue,
    MaxAmount,
    MinAmount,
    ExcludedStates,
    AllowedEquipmentTypes,
    ExcludedEquipmentTypes,
    ExcludedIndustries,
    MinPaynet,
}

type PredicateFn = fn(&Application, &RuleValue) -> Result<RuleCheck, RuleValueError>;

impl StandardRule {
    pub const ALL: [StandardRule; 10] = [
        StandardRule::MinFico,
        StandardRule::MinTibYears,
        StandardRule::MinRevenue,
        StandardRule::MaxAmount,
        StandardRule::MinAmount,
        StandardRule::ExcludedStates,
        StandardRule::AllowedEquipmentTypes,
        StandardRule::ExcludedEquipmentTypes,
        StandardRule::ExcludedIndustries,
        StandardRule::MinPaynet,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            StandardRule::MinFico => "min_fico",
            StandardRule::MinTibYears => "min_tib_years",
            StandardRule::MinRevenue => "min_revenue",
            StandardRule::MaxAmount => "max_amount",
            StandardRule::MinAmount => "min_amount",
            StandardRule::ExcludedStates => "excluded_states",
            StandardRule::AllowedEquipmentTypes => "allowed_equipment_types",
            StandardRule::ExcludedEquipmentTypes => "excluded_equipment_types",
            StandardRule::ExcludedIndustries => "excluded_industries",
            StandardRule::MinPaynet => "min_paynet",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.key() == key)
    }

    fn predicate(self) -> PredicateFn {
        match self {
            StandardRule::MinFico => predicates::min_fico,
            StandardRule::MinTibYears => predicates::min_tib_years,
            StandardRule::MinRevenue => predicates::min_revenue,
            StandardRule::MaxAmount => predicates::max_amount,
            StandardRule::MinAmount => predicates::min_amount,
            StandardRule::ExcludedStates => predicates::excluded_states,
            StandardRule::AllowedEquipmentTypes => predicates::allowed_equipment_types,
            StandardRule::ExcludedEquipmentTypes => predicates::excluded_equipment_types,
            StandardRule::ExcludedIndustries => predicates::excluded_industries,
            StandardRule::MinPaynet => predicates::min_paynet,
        }
    }
}

impl fmt::Display for StandardRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Dispatch table from rule identifier to predicate.
///
/// Built once and then only read; share it behind an `Arc` across evaluators and threads.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    predicates: HashMap<String, Arc<dyn RulePredicate>>,
}

static STANDARD_REGISTRY: OnceLock<Arc<RuleRegistry>> = OnceLock::new();

impl RuleRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for rule in StandardRule::ALL {
            registry.register(rule.key(), rule.predicate());
        }
        registry
    }

    /// Process-wide standard registry, built on first use.
    pub fn shared() -> Arc<RuleRegistry> {
        STANDARD_REGISTRY
            .get_or_init(|| Arc::new(Self::standard()))
            .clone()
    }

    /// Registers a predicate, returning the one it replaced.
    pub fn register<P>(
        &mut self,
        key: impl Into<String>,
        predicate: P,
    ) -> Option<Arc<dyn RulePredicate>>
    where
        P: RulePredicate + 'static,
    {
        self.predicates.insert(key.into(), Arc::new(predicate))
    }

    pub fn get(&self, key: &str) -> Option<&dyn RulePredicate> {
        self.predicates.get(key).map(|predicate| predicate.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.predicates.contains_key(key)
    }

    /// Registered identifiers, sorted for stable listings.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}
