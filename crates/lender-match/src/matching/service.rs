use std::sync::Arc;

use tracing::info;

use super::catalog::CatalogSeed;
use super::domain::{
    is_url_safe_slug, Application, ApplicationId, ApplicationRecord, Lender, LenderDraft,
    LenderId, Policy, PolicyDraft,
};
use super::engine::{MatchError, MatchResult, MatchingEngine};
use super::repository::{LendingRepository, RepositoryError};

/// Default number of lenders considered by a single match request.
pub const DEFAULT_LENDER_LIMIT: usize = 100;

/// Service composing the lending repository and the matching engine.
pub struct LenderMatchingService<R> {
    repository: Arc<R>,
    engine: Arc<MatchingEngine>,
    lender_limit: usize,
}

impl<R> LenderMatchingService<R>
where
    R: LendingRepository + 'static,
{
    pub fn new(repository: Arc<R>, engine: MatchingEngine) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            lender_limit: DEFAULT_LENDER_LIMIT,
        }
    }

    pub fn with_lender_limit(mut self, lender_limit: usize) -> Self {
        self.lender_limit = lender_limit;
        self
    }

    pub fn register_lender(&self, draft: LenderDraft) -> Result<Lender, LendingServiceError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if !is_url_safe_slug(&draft.slug) {
            return Err(ValidationError::InvalidSlug(draft.slug).into());
        }

        let lender = self.repository.insert_lender(draft)?;
        info!(lender_id = %lender.id, slug = %lender.slug, "lender registered");
        Ok(lender)
    }

    pub fn lenders(&self, skip: usize, limit: usize) -> Result<Vec<Lender>, LendingServiceError> {
        Ok(self.repository.lenders(skip, limit)?)
    }

    pub fn lender(&self, lender_id: LenderId) -> Result<Lender, LendingServiceError> {
        let lender = self
            .repository
            .lender(lender_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(lender)
    }

    pub fn add_policy(
        &self,
        lender_id: LenderId,
        draft: PolicyDraft,
    ) -> Result<Policy, LendingServiceError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }

        let policy = self.repository.insert_policy(lender_id, draft)?;
        info!(
            lender_id = %lender_id,
            policy_id = %policy.id,
            rules = policy.rules.len(),
            "policy added"
        );
        Ok(policy)
    }

    /// Validate and store a new application in `PENDING` status.
    pub fn submit_application(
        &self,
        application: Application,
    ) -> Result<ApplicationRecord, LendingServiceError> {
        validate_application(&application)?;
        let record = self.repository.insert_application(application)?;
        info!(application_id = %record.id, "application submitted");
        Ok(record)
    }

    pub fn application(
        &self,
        application_id: ApplicationId,
    ) -> Result<ApplicationRecord, LendingServiceError> {
        let record = self
            .repository
            .application(application_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Rank every catalog policy for a stored application.
    pub fn matches(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<MatchResult>, LendingServiceError> {
        let record = self.application(application_id)?;
        let results = self.rank_catalog(&record.application)?;

        info!(
            application_id = %application_id,
            policies = results.len(),
            eligible = results.iter().filter(|result| result.eligible).count(),
            "application matched"
        );
        Ok(results)
    }

    /// Ranks an application that is validated but never stored.
    pub fn preview(
        &self,
        application: &Application,
    ) -> Result<Vec<MatchResult>, LendingServiceError> {
        validate_application(application)?;
        let results = self.rank_catalog(application)?;

        info!(
            policies = results.len(),
            eligible = results.iter().filter(|result| result.eligible).count(),
            "application previewed"
        );
        Ok(results)
    }

    fn rank_catalog(
        &self,
        application: &Application,
    ) -> Result<Vec<MatchResult>, LendingServiceError> {
        let lenders = self.repository.lenders(0, self.lender_limit)?;
        Ok(self.engine.match_catalog(application, &lenders)?)
    }

    /// Registers seed lenders and policies that are not already present.
    ///
    /// Lenders are matched by slug and policies by name, so re-seeding is a no-op.
    pub fn seed(&self, seeds: Vec<CatalogSeed>) -> Result<usize, LendingServiceError> {
        let mut created = 0;
        for seed in seeds {
            let existing = self
                .repository
                .lenders(0, usize::MAX)?
                .into_iter()
                .find(|lender| lender.slug == seed.lender.slug);
            let lender = match existing {
                Some(lender) => lender,
                None => self.register_lender(seed.lender)?,
            };

            for draft in seed.policies {
                if lender.policies.iter().any(|policy| policy.name == draft.name) {
                    continue;
                }
                self.add_policy(lender.id, draft)?;
                created += 1;
            }
        }
        Ok(created)
    }
}

fn validate_application(application: &Application) -> Result<(), ValidationError> {
    if application.business_name.trim().is_empty() {
        return Err(ValidationError::MissingField("business_name"));
    }
    if application.equipment_type.trim().is_empty() {
        return Err(ValidationError::MissingField("equipment_type"));
    }
    if application.state.trim().is_empty() {
        return Err(ValidationError::MissingField("state"));
    }

    let amounts = [
        ("amount_requested", application.amount_requested),
        ("years_in_business", application.years_in_business),
        ("annual_revenue", application.annual_revenue),
    ];
    for (field, value) in amounts {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::NegativeAmount { field, value });
        }
    }
    Ok(())
}

/// Intake payload problems detected before anything is stored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("slug '{0}' must use lowercase letters, digits, '-' or '_'")]
    InvalidSlug(String),
    #[error("{field} must be a non-negative number, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },
}

/// Error raised by the lending service.
#[derive(Debug, thiserror::Error)]
pub enum LendingServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Match(#[from] MatchError),
}
