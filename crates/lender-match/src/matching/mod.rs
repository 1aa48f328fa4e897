//! Policy rule evaluation and lender matching.
//!
//! An [`Application`] is checked against each lender [`Policy`] through a [`RuleRegistry`]
//! of named predicates. The [`MatchingEngine`] scores every policy and returns a ranked,
//! unfiltered list of [`MatchResult`]s. Everything in the engine is pure in-memory work;
//! persistence and HTTP sit behind the repository, service, and router modules.

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod evaluation;
pub mod report;
pub mod repository;
pub mod router;
pub mod rule_set;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{materialize, standard_catalog, CatalogSeed};
pub use domain::{
    Application, ApplicationId, ApplicationRecord, ApplicationStatus, Lender, LenderDraft,
    LenderId, Policy, PolicyDraft, PolicyId,
};
pub use engine::{match_application, rank, LenderLookup, MatchError, MatchResult, MatchingEngine};
pub use evaluation::{
    evaluate, EvaluationOutcome, RuleCheck, RuleEvaluator, RulePredicate, RuleRegistry,
    StandardRule,
};
pub use report::{write_csv, MatchSummary, ReportError};
pub use repository::{LendingRepository, RepositoryError};
pub use router::lending_router;
pub use rule_set::{RuleSet, RuleValue, RuleValueError};
pub use scoring::{BinaryScorer, MatchScorer};
pub use service::{LenderMatchingService, LendingServiceError, ValidationError};
