//! Plan-based job slot admission control.
//!
//! A check reads the plan allowance, counts active careers, then decides. Nothing
//! is reserved between the read and the caller's write, so two concurrent
//! publishers can both observe a free slot.

pub mod counter;
pub mod decision;
pub mod plan;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::domain::OrgId;
use super::repository::{CareerStore, OrganizationStore, RepositoryError};

pub use counter::ActiveCareerCounter;
pub use decision::QuotaDecision;
pub use plan::{PlanAllowance, PlanResolver, DEFAULT_EXTRA_JOB_SLOTS, DEFAULT_PLAN_JOB_LIMIT};

/// Failure while evaluating an organization's quota.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuotaError {
    #[error("Invalid orgID")]
    InvalidIdentifier,
    #[error("Organization not found")]
    OrganizationNotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Everything one quota check observed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaSnapshot {
    #[serde(skip)]
    pub org_id: OrgId,
    pub allowance: PlanAllowance,
    pub decision: QuotaDecision,
}

/// Combines plan resolution with the active career count.
pub struct QuotaEvaluator<O, C> {
    plans: PlanResolver<O>,
    counter: ActiveCareerCounter<C>,
}

impl<O, C> QuotaEvaluator<O, C>
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    pub fn new(organizations: Arc<O>, careers: Arc<C>) -> Self {
        Self {
            plans: PlanResolver::new(organizations),
            counter: ActiveCareerCounter::new(careers),
        }
    }

    pub fn plans(&self) -> &PlanResolver<O> {
        &self.plans
    }

    /// Resolve, count, decide. The count uses the raw id string as submitted.
    pub async fn evaluate(&self, raw_org_id: &str) -> Result<QuotaSnapshot, QuotaError> {
        let (org_id, allowance) = self.plans.resolve_raw(raw_org_id).await?;
        let active_count = self.counter.count(raw_org_id).await?;
        let decision = QuotaDecision::evaluate(allowance.job_limit_total(), active_count);

        debug!(
            org_id = %org_id,
            job_limit_total = decision.job_limit_total,
            active_count,
            can_publish = decision.can_publish,
            "quota evaluated"
        );

        Ok(QuotaSnapshot {
            org_id,
            allowance,
            decision,
        })
    }
}
