use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::domain::{Application, Lender, LenderId, Policy, PolicyId};
use super::evaluation::RuleEvaluator;
use super::scoring::{BinaryScorer, MatchScorer};

/// Ranked eligibility of one policy for one application. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub lender_name: String,
    pub policy_name: String,
    pub eligible: bool,
    pub reasons: Vec<String>,
    pub score: f64,
}

/// Resolves a policy's owning lender for reporting.
pub trait LenderLookup {
    fn lender_name(&self, id: LenderId) -> Option<&str>;
}

impl LenderLookup for [Lender] {
    fn lender_name(&self, id: LenderId) -> Option<&str> {
        self.iter()
            .find(|lender| lender.id == id)
            .map(|lender| lender.name.as_str())
    }
}

impl LenderLookup for BTreeMap<LenderId, String> {
    fn lender_name(&self, id: LenderId) -> Option<&str> {
        self.get(&id).map(String::as_str)
    }
}

/// Inputs the engine refuses to rank because the report would be wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    #[error("policy {policy} references unknown lender {lender}")]
    UnknownLender { policy: PolicyId, lender: LenderId },
}

/// Evaluates and ranks policies for an application.
///
/// The engine holds no per-request state, so one instance can serve concurrent requests.
#[derive(Debug, Clone)]
pub struct MatchingEngine<S = BinaryScorer> {
    evaluator: RuleEvaluator,
    scorer: S,
}

impl Default for MatchingEngine {
    fn default() -> Self {
        Self::new(RuleEvaluator::default())
    }
}

impl MatchingEngine {
    pub fn new(evaluator: RuleEvaluator) -> Self {
        Self::with_scorer(evaluator, BinaryScorer)
    }
}

impl<S> MatchingEngine<S>
where
    S: MatchScorer,
{
    pub fn with_scorer(evaluator: RuleEvaluator, scorer: S) -> Self {
        Self { evaluator, scorer }
    }

    /// Produces one result per policy, ranked by score with ties kept in input order.
    pub fn match_policies<'p, I, L>(
        &self,
        application: &Application,
        policies: I,
        lenders: &L,
    ) -> Result<Vec<MatchResult>, MatchError>
    where
        I: IntoIterator<Item = &'p Policy>,
        L: LenderLookup + ?Sized,
    {
        let mut results = Vec::new();

        for policy in policies {
            let lender_name =
                lenders
                    .lender_name(policy.lender_id)
                    .ok_or(MatchError::UnknownLender {
                        policy: policy.id,
                        lender: policy.lender_id,
                    })?;

            let outcome = self.evaluator.evaluate(application, &policy.rules);
            let score = self.scorer.score(policy, &outcome);
            debug!(
                lender = lender_name,
                policy = %policy.name,
                eligible = outcome.eligible,
                score,
                "policy evaluated"
            );

            results.push(MatchResult {
                lender_name: lender_name.to_string(),
                policy_name: policy.name.clone(),
                eligible: outcome.eligible,
                reasons: outcome.reasons,
                score,
            });
        }

        rank(&mut results);
        Ok(results)
    }

    /// Matches against every policy of every lender, in catalog order.
    pub fn match_catalog(
        &self,
        application: &Application,
        lenders: &[Lender],
    ) -> Result<Vec<MatchResult>, MatchError> {
        let policies = lenders.iter().flat_map(|lender| lender.policies.iter());
        self.match_policies(application, policies, lenders)
    }
}

/// Stable sort by descending score; equal scores keep their relative order.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Ranks policies with the standard registry and pass/fail scoring.
pub fn match_application<'p, I, L>(
    application: &Application,
    policies: I,
    lenders: &L,
) -> Result<Vec<MatchResult>, MatchError>
where
    I: IntoIterator<Item = &'p Policy>,
    L: LenderLookup + ?Sized,
{
    MatchingEngine::default().match_policies(application, policies, lenders)
}
