mod predicates;
mod registry;

pub use registry::{RuleCheck, RulePredicate, RuleRegistry, StandardRule};

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::domain::Application;
use super::rule_set::RuleSet;

/// Stateless evaluator that applies one policy's rule set to an application.
#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    registry: Arc<RuleRegistry>,
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(RuleRegistry::shared())
    }
}

impl RuleEvaluator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    /// Runs every rule with a registered predicate, collecting each failure.
    ///
    /// Rules are visited in rule-set order and never short-circuit, so the outcome lists
    /// every violated constraint. A rule whose value has the wrong shape fails on its own
    /// without affecting the others.
    pub fn evaluate(&self, application: &Application, rules: &RuleSet) -> EvaluationOutcome {
        let mut outcome = EvaluationOutcome::eligible();

        for (key, value) in rules.iter() {
            let Some(predicate) = self.registry.get(key) else {
                debug!(rule = key, "no predicate registered for rule; ignoring");
                outcome.ignored_rules.push(key.to_string());
                continue;
            };

            match predicate.check(application, value) {
                Ok(RuleCheck::Passed) => {}
                Ok(RuleCheck::Failed { reason }) => outcome.reject(reason),
                Err(error) => {
                    warn!(rule = key, %error, "malformed rule value");
                    outcome.reject(format!("Rule {key} has malformed value: {error}"));
                }
            }
        }

        outcome
    }
}

/// Aggregate result of one policy evaluation. `reasons` is empty iff `eligible`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationOutcome {
    pub eligible: bool,
    pub reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored_rules: Vec<String>,
}

impl EvaluationOutcome {
    fn eligible() -> Self {
        Self {
            eligible: true,
            reasons: Vec::new(),
            ignored_rules: Vec::new(),
        }
    }

    fn reject(&mut self, reason: String) {
        self.eligible = false;
        self.reasons.push(reason);
    }

    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.eligible, self.reasons)
    }
}

/// Evaluates a rule set with the process-wide standard registry.
pub fn evaluate(application: &Application, rules: &RuleSet) -> (bool, Vec<String>) {
    RuleEvaluator::default()
        .evaluate(application, rules)
        .into_parts()
}
