use serde::{Deserialize, Serialize};

use super::domain::{Lender, LenderDraft, LenderId, Policy, PolicyDraft, PolicyId};
use super::rule_set::RuleSet;

/// A lender together with the policies it should be registered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogSeed {
    pub lender: LenderDraft,
    pub policies: Vec<PolicyDraft>,
}

/// Broker programs the platform ships with.
pub fn standard_catalog() -> Vec<CatalogSeed> {
    vec![
        CatalogSeed {
            lender: LenderDraft::new("Advantage+ Financing", "advantage_plus", "Lender"),
            policies: vec![PolicyDraft::new(
                "Standard Broker Program",
                RuleSet::new()
                    .with("max_amount", 75_000)
                    .with("min_fico", 680)
                    .with("min_tib_years", 2)
                    .with("excluded_states", Vec::<String>::new()),
            )],
        },
        CatalogSeed {
            lender: LenderDraft::new("Apex Commercial Capital", "apex", "Lender"),
            policies: vec![
                PolicyDraft::new(
                    "Tier A",
                    RuleSet::new()
                        .with("min_amount", 10_000)
                        .with("max_amount", 500_000)
                        .with("min_tib_years", 5)
                        .with("min_fico", 700)
                        .with("excluded_equipment_types", ["Trucking", "Cannabis"])
                        .with("excluded_states", ["CA", "NV", "ND", "VT"]),
                ),
                PolicyDraft::new(
                    "Tier B",
                    RuleSet::new()
                        .with("min_amount", 10_000)
                        .with("max_amount", 250_000)
                        .with("min_tib_years", 3)
                        .with("min_fico", 670)
                        .with("excluded_states", ["CA", "NV", "ND", "VT"]),
                ),
            ],
        },
        CatalogSeed {
            lender: LenderDraft::new("Stearns Bank", "stearns", "Bank"),
            policies: vec![PolicyDraft::new(
                "Tier 1",
                RuleSet::new()
                    .with("min_fico", 725)
                    .with("min_tib_years", 3)
                    .with("min_paynet", 685)
                    .with("excluded_industries", ["Gaming", "Oil & Gas"]),
            )],
        },
    ]
}

/// Assigns sequential identities to seeds so they can be matched without a repository.
pub fn materialize(seeds: Vec<CatalogSeed>) -> Vec<Lender> {
    let mut next_policy = 1;
    seeds
        .into_iter()
        .zip(1..)
        .map(|(seed, lender_seq)| {
            let lender_id = LenderId(lender_seq);
            let policies = seed
                .policies
                .into_iter()
                .map(|draft| {
                    let policy = Policy {
                        id: PolicyId(next_policy),
                        lender_id,
                        name: draft.name,
                        version: draft.version,
                        rules: draft.rules,
                    };
                    next_policy += 1;
                    policy
                })
                .collect();

            Lender {
                id: lender_id,
                name: seed.lender.name,
                slug: seed.lender.slug,
                lender_type: seed.lender.lender_type,
                policies,
            }
        })
        .collect()
}
