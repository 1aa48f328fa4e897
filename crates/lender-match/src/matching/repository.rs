use super::domain::{
    Application, ApplicationId, ApplicationRecord, Lender, LenderDraft, LenderId, Policy,
    PolicyDraft,
};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations assign identities and keep each lender's policies in insertion order.
pub trait LendingRepository: Send + Sync {
    fn insert_lender(&self, draft: LenderDraft) -> Result<Lender, RepositoryError>;
    fn lender(&self, id: LenderId) -> Result<Option<Lender>, RepositoryError>;
    fn lenders(&self, skip: usize, limit: usize) -> Result<Vec<Lender>, RepositoryError>;
    fn insert_policy(
        &self,
        lender_id: LenderId,
        draft: PolicyDraft,
    ) -> Result<Policy, RepositoryError>;
    fn insert_application(
        &self,
        application: Application,
    ) -> Result<ApplicationRecord, RepositoryError>;
    fn application(&self, id: ApplicationId)
        -> Result<Option<ApplicationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{0} already exists")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
