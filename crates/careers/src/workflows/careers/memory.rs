use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::domain::{Career, CareerId, CareerStatus, OrgId};
use super::repository::{
    plan_ids_match, CareerStore, OrganizationProfile, OrganizationRecord, OrganizationStore,
    PlanRecord, RepositoryError, SlotValue,
};

#[derive(Debug, Default)]
struct Collections {
    plans: Vec<PlanRecord>,
    organizations: HashMap<OrgId, OrganizationRecord>,
    careers: HashMap<CareerId, Career>,
}

/// Process-local store backing both organizations and careers.
/// Used when no MongoDB connection is configured, and by the demo and tests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCareerStore {
    inner: Arc<Mutex<Collections>>,
}

impl InMemoryCareerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_plan(
        &self,
        id: impl Into<String>,
        job_limit: impl Into<SlotValue>,
    ) -> Result<(), RepositoryError> {
        let mut collections = self.lock()?;
        collections.plans.push(PlanRecord {
            id: id.into(),
            job_limit: job_limit.into(),
        });
        Ok(())
    }

    pub fn insert_organization(&self, record: OrganizationRecord) -> Result<(), RepositoryError> {
        self.lock()?.organizations.insert(record.id, record);
        Ok(())
    }

    /// Seed an organization on `plan_id` with `extra_job_slots` purchased slots.
    pub fn with_organization(
        self,
        org_id: OrgId,
        plan_id: Option<&str>,
        extra_job_slots: impl Into<SlotValue>,
    ) -> Result<Self, RepositoryError> {
        self.insert_organization(OrganizationRecord {
            id: org_id,
            plan_id: plan_id.map(str::to_string),
            extra_job_slots: extra_job_slots.into(),
        })?;
        Ok(self)
    }

    pub fn with_plan(
        self,
        id: impl Into<String>,
        job_limit: impl Into<SlotValue>,
    ) -> Result<Self, RepositoryError> {
        self.insert_plan(id, job_limit)?;
        Ok(self)
    }

    pub fn careers(&self) -> Result<Vec<Career>, RepositoryError> {
        let collections = self.lock()?;
        let mut careers: Vec<Career> = collections.careers.values().cloned().collect();
        careers.sort_by(|left, right| left.created_at.cmp(&right.created_at));
        Ok(careers)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Collections>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Backend("career store lock poisoned".to_string()))
    }
}

#[async_trait]
impl OrganizationStore for InMemoryCareerStore {
    async fn organization_profile(
        &self,
        org_id: &OrgId,
    ) -> Result<Option<OrganizationProfile>, RepositoryError> {
        let collections = self.lock()?;
        let Some(organization) = collections.organizations.get(org_id).cloned() else {
            return Ok(None);
        };
        let plan = organization.plan_id.as_deref().and_then(|plan_id| {
            collections
                .plans
                .iter()
                .find(|plan| plan_ids_match(&plan.id, plan_id))
                .cloned()
        });
        Ok(Some(OrganizationProfile { organization, plan }))
    }
}

#[async_trait]
impl CareerStore for InMemoryCareerStore {
    async fn count_by_status(
        &self,
        org_ref: &str,
        statuses: &[CareerStatus],
    ) -> Result<u64, RepositoryError> {
        let collections = self.lock()?;
        let count = collections
            .careers
            .values()
            .filter(|career| career.org_id == org_ref && statuses.contains(&career.status))
            .count();
        Ok(count as u64)
    }

    async fn insert(&self, career: Career) -> Result<Career, RepositoryError> {
        let mut collections = self.lock()?;
        if collections.careers.contains_key(&career.id) {
            return Err(RepositoryError::Conflict);
        }
        collections.careers.insert(career.id.clone(), career.clone());
        Ok(career)
    }

    async fn update(&self, career: Career) -> Result<(), RepositoryError> {
        let mut collections = self.lock()?;
        match collections.careers.get_mut(&career.id) {
            Some(slot) => {
                *slot = career;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn fetch(&self, id: &CareerId) -> Result<Option<Career>, RepositoryError> {
        Ok(self.lock()?.careers.get(id).cloned())
    }
}
