use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::matching::domain::{
    Application, ApplicationId, ApplicationRecord, ApplicationStatus, Lender, LenderDraft,
    LenderId, Policy, PolicyDraft, PolicyId,
};
use crate::matching::repository::{LendingRepository, RepositoryError};
use crate::matching::rule_set::RuleSet;
use crate::matching::{lending_router, LenderMatchingService, MatchingEngine};

/// The reference applicant: FICO 700, $100k truck in Texas, four years in business.
pub(super) fn application() -> Application {
    Application {
        business_name: "Lone Star Freight LLC".to_string(),
        amount_requested: 100_000.0,
        equipment_type: "Truck".to_string(),
        fico_score: 700,
        years_in_business: 4.0,
        annual_revenue: 0.0,
        paynet_score: None,
        city: "Dallas".to_string(),
        state: "TX".to_string(),
        zip_code: "75201".to_string(),
        attributes: BTreeMap::new(),
    }
}

pub(super) fn policy(id: u64, lender_id: u64, name: &str, rules: RuleSet) -> Policy {
    Policy {
        id: PolicyId(id),
        lender_id: LenderId(lender_id),
        name: name.to_string(),
        version: 1,
        rules,
    }
}

pub(super) fn lender(id: u64, name: &str, policies: Vec<Policy>) -> Lender {
    Lender {
        id: LenderId(id),
        name: name.to_string(),
        slug: name.to_lowercase().replace(' ', "_"),
        lender_type: "Lender".to_string(),
        policies,
    }
}

pub(super) fn lender_names(entries: &[(u64, &str)]) -> BTreeMap<LenderId, String> {
    entries
        .iter()
        .map(|(id, name)| (LenderId(*id), name.to_string()))
        .collect()
}

pub(super) fn build_service() -> (
    LenderMatchingService<MemoryRepository>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = LenderMatchingService::new(repository.clone(), MatchingEngine::default());
    (service, repository)
}

pub(super) fn router_with_service(service: LenderMatchingService<MemoryRepository>) -> axum::Router {
    lending_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
struct MemoryState {
    lenders: Vec<Lender>,
    applications: Vec<ApplicationRecord>,
    next_policy: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl LendingRepository for MemoryRepository {
    fn insert_lender(&self, draft: LenderDraft) -> Result<Lender, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if guard.lenders.iter().any(|lender| lender.slug == draft.slug) {
            return Err(RepositoryError::Conflict(format!("lender '{}'", draft.slug)));
        }
        let lender = Lender {
            id: LenderId(guard.lenders.len() as u64 + 1),
            name: draft.name,
            slug: draft.slug,
            lender_type: draft.lender_type,
            policies: Vec::new(),
        };
        guard.lenders.push(lender.clone());
        Ok(lender)
    }

    fn lender(&self, id: LenderId) -> Result<Option<Lender>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.lenders.iter().find(|lender| lender.id == id).cloned())
    }

    fn lenders(&self, skip: usize, limit: usize) -> Result<Vec<Lender>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.lenders.iter().skip(skip).take(limit).cloned().collect())
    }

    fn insert_policy(
        &self,
        lender_id: LenderId,
        draft: PolicyDraft,
    ) -> Result<Policy, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_policy += 1;
        let id = PolicyId(guard.next_policy);
        let lender = guard
            .lenders
            .iter_mut()
            .find(|lender| lender.id == lender_id)
            .ok_or(RepositoryError::NotFound)?;
        let policy = Policy {
            id,
            lender_id,
            name: draft.name,
            version: draft.version,
            rules: draft.rules,
        };
        lender.policies.push(policy.clone());
        Ok(policy)
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        let record = ApplicationRecord {
            id: ApplicationId(guard.applications.len() as u64 + 1),
            application,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };
        guard.applications.push(record.clone());
        Ok(record)
    }

    fn application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .applications
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }
}

pub(super) struct UnavailableRepository;

impl LendingRepository for UnavailableRepository {
    fn insert_lender(&self, _draft: LenderDraft) -> Result<Lender, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn lender(&self, _id: LenderId) -> Result<Option<Lender>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn lenders(&self, _skip: usize, _limit: usize) -> Result<Vec<Lender>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_policy(
        &self,
        _lender_id: LenderId,
        _draft: PolicyDraft,
    ) -> Result<Policy, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_application(
        &self,
        _application: Application,
    ) -> Result<ApplicationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn application(
        &self,
        _id: ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}
