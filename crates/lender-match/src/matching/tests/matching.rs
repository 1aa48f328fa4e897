use std::thread;

use super::common::*;
use crate::matching::domain::{LenderId, Policy, PolicyId};
use crate::matching::engine::{match_application, MatchError, MatchingEngine};
use crate::matching::evaluation::{EvaluationOutcome, RuleEvaluator};
use crate::matching::rule_set::RuleSet;
use crate::matching::scoring::MatchScorer;
use crate::matching::{materialize, standard_catalog};

fn strict() -> RuleSet {
    RuleSet::new().with("min_fico", 760)
}

fn lenient() -> RuleSet {
    RuleSet::new().with("min_fico", 600)
}

#[test]
fn eligible_results_move_ahead_of_ineligible_ones() {
    let lenders = lender_names(&[(1, "Bravo Capital"), (2, "Alpha Leasing")]);
    let policies = vec![
        policy(1, 1, "B", strict()),
        policy(2, 2, "A", lenient()),
    ];

    let results = match_application(&application(), &policies, &lenders).expect("matches");

    let names: Vec<&str> = results.iter().map(|r| r.policy_name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(results[0].score, 100.0);
    assert_eq!(results[0].lender_name, "Alpha Leasing");
    assert_eq!(results[1].score, 0.0);
}

#[test]
fn equal_scores_keep_input_order() {
    let lenders = lender_names(&[(1, "Lender One")]);
    let policies = vec![
        policy(1, 1, "ineligible-1", strict()),
        policy(2, 1, "eligible-1", lenient()),
        policy(3, 1, "ineligible-2", strict()),
        policy(4, 1, "eligible-2", RuleSet::new()),
        policy(5, 1, "ineligible-3", strict()),
        policy(6, 1, "eligible-3", lenient()),
    ];

    let results = match_application(&application(), &policies, &lenders).expect("matches");

    let names: Vec<&str> = results.iter().map(|r| r.policy_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "eligible-1",
            "eligible-2",
            "eligible-3",
            "ineligible-1",
            "ineligible-2",
            "ineligible-3",
        ]
    );
}

#[test]
fn one_result_per_policy_with_binary_scores() {
    let lenders = materialize(standard_catalog());
    let policy_count: usize = lenders.iter().map(|lender| lender.policies.len()).sum();

    let results = MatchingEngine::default()
        .match_catalog(&application(), &lenders)
        .expect("catalog matches");

    assert_eq!(results.len(), policy_count);
    for lender in &lenders {
        for policy in &lender.policies {
            let occurrences = results
                .iter()
                .filter(|r| r.lender_name == lender.name && r.policy_name == policy.name)
                .count();
            assert_eq!(occurrences, 1, "{} / {}", lender.name, policy.name);
        }
    }
    assert!(results.iter().all(|r| r.score == 0.0 || r.score == 100.0));
    assert!(results
        .iter()
        .all(|r| r.eligible == r.reasons.is_empty()));
}

#[test]
fn standard_catalog_ranks_the_reference_applicant() {
    let lenders = materialize(standard_catalog());

    let results = MatchingEngine::default()
        .match_catalog(&application(), &lenders)
        .expect("catalog matches");

    let summary: Vec<(&str, bool)> = results
        .iter()
        .map(|r| (r.policy_name.as_str(), r.eligible))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Tier B", true),
            ("Standard Broker Program", false),
            ("Tier A", false),
            ("Tier 1", false),
        ]
    );
    assert_eq!(
        results[1].reasons,
        vec!["Requested Amount 100000 exceeds maximum 75000".to_string()]
    );
    assert_eq!(
        results[2].reasons,
        vec!["Time in Business 4 years is below minimum 5".to_string()]
    );
    assert_eq!(
        results[3].reasons,
        vec![
            "FICO Score 700 is below minimum 725".to_string(),
            "PayNet score is required but missing".to_string(),
        ]
    );
}

#[test]
fn ineligible_matches_are_not_filtered() {
    let lenders = lender_names(&[(1, "Lender One")]);
    let policies = vec![policy(1, 1, "only", strict())];

    let results = match_application(&application(), &policies, &lenders).expect("matches");

    assert_eq!(results.len(), 1);
    assert!(!results[0].eligible);
}

#[test]
fn unknown_lender_is_a_typed_error() {
    let lenders = lender_names(&[(1, "Lender One")]);
    let policies = vec![
        policy(1, 1, "known", lenient()),
        policy(9, 42, "orphan", lenient()),
    ];

    let error = match_application(&application(), &policies, &lenders)
        .expect_err("orphan policy rejected");

    assert_eq!(
        error,
        MatchError::UnknownLender {
            policy: PolicyId(9),
            lender: LenderId(42),
        }
    );
}

#[test]
fn malformed_policy_does_not_abort_other_policies() {
    let lenders = lender_names(&[(1, "Lender One"), (2, "Lender Two")]);
    let policies = vec![
        policy(1, 1, "broken", RuleSet::new().with("excluded_states", 5)),
        policy(2, 2, "healthy", lenient()),
    ];

    let results = match_application(&application(), &policies, &lenders).expect("matches");

    assert_eq!(results[0].policy_name, "healthy");
    assert!(results[0].eligible);
    assert_eq!(results[1].policy_name, "broken");
    assert!(results[1].reasons[0].starts_with("Rule excluded_states has malformed value"));
}

#[test]
fn match_result_serializes_with_report_fields() {
    let lenders = lender_names(&[(1, "Lender One")]);
    let policies = vec![policy(1, 1, "Tier A", lenient())];

    let results = match_application(&application(), &policies, &lenders).expect("matches");
    let value = serde_json::to_value(&results[0]).expect("serializes");

    let mut keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["eligible", "lender_name", "policy_name", "reasons", "score"]
    );
}

struct HeadroomScorer;

impl MatchScorer for HeadroomScorer {
    fn score(&self, policy: &Policy, outcome: &EvaluationOutcome) -> f64 {
        if !outcome.eligible {
            return 0.0;
        }
        let minimum = policy
            .rules
            .get("min_fico")
            .and_then(|value| value.as_number().ok())
            .unwrap_or(0.0);
        100.0 + (700.0 - minimum)
    }
}

#[test]
fn scorer_seam_changes_ranking_without_touching_evaluation() {
    let lenders = lender_names(&[(1, "Lender One")]);
    let policies = vec![
        policy(1, 1, "tight", RuleSet::new().with("min_fico", 690)),
        policy(2, 1, "roomy", RuleSet::new().with("min_fico", 600)),
    ];
    let engine = MatchingEngine::with_scorer(RuleEvaluator::default(), HeadroomScorer);

    let results = engine
        .match_policies(&application(), &policies, &lenders)
        .expect("matches");

    assert_eq!(results[0].policy_name, "roomy");
    assert_eq!(results[0].score, 200.0);
    assert_eq!(results[1].score, 110.0);
}

#[test]
fn engine_is_shareable_across_threads() {
    let engine = &MatchingEngine::default();
    let lenders = &materialize(standard_catalog());

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || engine.match_catalog(&application(), lenders)))
            .collect();
        let expected = engine
            .match_catalog(&application(), lenders)
            .expect("matches");
        for handle in handles {
            let results = handle.join().expect("thread joins").expect("matches");
            assert_eq!(results, expected);
        }
    });
}

#[test]
fn catalog_lenders_supply_their_own_names() {
    let lenders = vec![
        lender(1, "Bravo Capital", vec![policy(1, 1, "Gold", strict())]),
        lender(2, "Alpha Leasing", vec![policy(2, 2, "Silver", lenient())]),
    ];

    let results = MatchingEngine::default()
        .match_catalog(&application(), &lenders)
        .expect("catalog matches");

    assert_eq!(results[0].lender_name, "Alpha Leasing");
    assert_eq!(results[1].lender_name, "Bravo Capital");
    assert_eq!(results[1].reasons, vec!["FICO Score 700 is below minimum 760".to_string()]);
}
