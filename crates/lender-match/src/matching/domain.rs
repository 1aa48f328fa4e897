use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::rule_set::RuleSet;

/// Identifier wrapper for stored financing applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

/// Identifier wrapper for lenders in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LenderId(pub u64);

/// Identifier wrapper for underwriting policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LenderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Attributes of one equipment-financing request as submitted by the broker.
///
/// Evaluation only ever borrows an application; nothing in the engine mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub business_name: String,
    pub amount_requested: f64,
    pub equipment_type: String,
    pub fico_score: u16,
    pub years_in_business: f64,
    pub annual_revenue: f64,
    #[serde(default)]
    pub paynet_score: Option<u16>,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    /// Extra intake fields that no rule consumes yet.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

/// Lifecycle of a stored application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Approved => "APPROVED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

/// Application as held by the repository, with its identity and intake metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    #[serde(flatten)]
    pub application: Application,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// A named, versioned rule set owned by a lender.
///
/// `lender_id` is a plain foreign key; the lender's name is resolved at report time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub lender_id: LenderId,
    pub name: String,
    pub version: u32,
    #[serde(default)]
    pub rules: RuleSet,
}

/// Lending institution and the ordered policies it underwrites with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: LenderId,
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub lender_type: String,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// Payload for registering a lender before it has an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LenderDraft {
    pub name: String,
    pub slug: String,
    #[serde(rename = "type")]
    pub lender_type: String,
}

impl LenderDraft {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        lender_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            lender_type: lender_type.into(),
        }
    }
}

/// Payload for attaching a policy to an existing lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDraft {
    pub name: String,
    #[serde(default = "default_policy_version")]
    pub version: u32,
    #[serde(default)]
    pub rules: RuleSet,
}

impl PolicyDraft {
    pub fn new(name: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            name: name.into(),
            version: default_policy_version(),
            rules,
        }
    }
}

fn default_policy_version() -> u32 {
    1
}

/// Slugs end up in URLs, so only lowercase ASCII letters, digits, `-` and `_` are allowed.
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}
