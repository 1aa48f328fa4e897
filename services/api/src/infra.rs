use lender_match::matching::{
    Application, ApplicationId, ApplicationRecord, ApplicationStatus, Lender, LenderDraft,
    LenderId, LendingRepository, Policy, PolicyDraft, PolicyId, RepositoryError,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct Catalog {
    lenders: BTreeMap<LenderId, Lender>,
    applications: BTreeMap<ApplicationId, ApplicationRecord>,
    next_lender: u64,
    next_policy: u64,
    next_application: u64,
}

/// Process-local lending store used until a database backend is wired in.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLendingRepository {
    catalog: Arc<Mutex<Catalog>>,
}

impl InMemoryLendingRepository {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Catalog>, RepositoryError> {
        self.catalog
            .lock()
            .map_err(|_| RepositoryError::Unavailable("lending store lock poisoned".to_string()))
    }
}

impl LendingRepository for InMemoryLendingRepository {
    fn insert_lender(&self, draft: LenderDraft) -> Result<Lender, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.lenders.values().any(|lender| lender.slug == draft.slug) {
            return Err(RepositoryError::Conflict(format!("lender '{}'", draft.slug)));
        }
        guard.next_lender += 1;
        let lender = Lender {
            id: LenderId(guard.next_lender),
            name: draft.name,
            slug: draft.slug,
            lender_type: draft.lender_type,
            policies: Vec::new(),
        };
        guard.lenders.insert(lender.id, lender.clone());
        Ok(lender)
    }

    fn lender(&self, id: LenderId) -> Result<Option<Lender>, RepositoryError> {
        Ok(self.lock()?.lenders.get(&id).cloned())
    }

    fn lenders(&self, skip: usize, limit: usize) -> Result<Vec<Lender>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.lenders.values().skip(skip).take(limit).cloned().collect())
    }

    fn insert_policy(
        &self,
        lender_id: LenderId,
        draft: PolicyDraft,
    ) -> Result<Policy, RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.lenders.contains_key(&lender_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.next_policy += 1;
        let policy = Policy {
            id: PolicyId(guard.next_policy),
            lender_id,
            name: draft.name,
            version: draft.version,
            rules: draft.rules,
        };
        if let Some(lender) = guard.lenders.get_mut(&lender_id) {
            lender.policies.push(policy.clone());
        }
        Ok(policy)
    }

    fn insert_application(
        &self,
        application: Application,
    ) -> Result<ApplicationRecord, RepositoryError> {
        let mut guard = self.lock()?;
        guard.next_application += 1;
        let record = ApplicationRecord {
            id: ApplicationId(guard.next_application),
            application,
            status: ApplicationStatus::Pending,
            created_at: Utc::now(),
        };
        guard.applications.insert(record.id, record.clone());
        Ok(record)
    }

    fn application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<ApplicationRecord>, RepositoryError> {
        Ok(self.lock()?.applications.get(&id).cloned())
    }
}
