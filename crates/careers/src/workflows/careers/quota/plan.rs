use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::debug;

use super::super::domain::OrgId;
use super::super::repository::{OrganizationStore, SlotValue};
use super::QuotaError;

/// Job limit granted when an organization has no resolvable plan.
pub const DEFAULT_PLAN_JOB_LIMIT: f64 = 3.0;
/// Extra slots assumed when an organization never purchased any.
pub const DEFAULT_EXTRA_JOB_SLOTS: f64 = 0.0;

/// Resolved slot allowance for one organization. Stored limits may be fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAllowance {
    #[serde(serialize_with = "serialize_count")]
    pub job_limit: f64,
    #[serde(serialize_with = "serialize_count")]
    pub extra_job_slots: f64,
}

impl PlanAllowance {
    /// Coerce raw stored values, each side falling back independently before summing.
    pub fn from_raw(plan_job_limit: Option<&SlotValue>, extra_job_slots: &SlotValue) -> Self {
        let job_limit = plan_job_limit
            .map(|limit| limit.coerce(DEFAULT_PLAN_JOB_LIMIT))
            .unwrap_or(DEFAULT_PLAN_JOB_LIMIT);
        Self {
            job_limit,
            extra_job_slots: extra_job_slots.coerce(DEFAULT_EXTRA_JOB_SLOTS),
        }
    }

    pub fn job_limit_total(&self) -> f64 {
        self.job_limit + self.extra_job_slots
    }
}

/// Write whole counts as integers so a limit of `3.0` goes out as `3`.
pub(crate) fn serialize_count<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract() == 0.0 && value.abs() <= i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Looks up an organization and its plan to produce a [`PlanAllowance`].
pub struct PlanResolver<O> {
    store: Arc<O>,
}

impl<O> PlanResolver<O>
where
    O: OrganizationStore + 'static,
{
    pub fn new(store: Arc<O>) -> Self {
        Self { store }
    }

    /// Resolve by raw identifier, rejecting ids that are not ObjectId shaped.
    pub async fn resolve_raw(&self, raw_org_id: &str) -> Result<(OrgId, PlanAllowance), QuotaError> {
        let org_id = OrgId::parse(raw_org_id).map_err(|_| QuotaError::InvalidIdentifier)?;
        let allowance = self.resolve(&org_id).await?;
        Ok((org_id, allowance))
    }

    pub async fn resolve(&self, org_id: &OrgId) -> Result<PlanAllowance, QuotaError> {
        let profile = self
            .store
            .organization_profile(org_id)
            .await?
            .ok_or(QuotaError::OrganizationNotFound)?;

        let allowance = PlanAllowance::from_raw(
            profile.plan.as_ref().map(|plan| &plan.job_limit),
            &profile.organization.extra_job_slots,
        );
        debug!(
            org_id = %org_id,
            plan_found = profile.plan.is_some(),
            job_limit = allowance.job_limit,
            extra_job_slots = allowance.extra_job_slots,
            "resolved plan allowance"
        );
        Ok(allowance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fractional_limits_are_kept() {
        let allowance = PlanAllowance::from_raw(Some(&SlotValue::Number(2.5)), &SlotValue::Missing);
        assert_eq!(allowance.job_limit_total(), 2.5);
    }

    #[test]
    fn blank_plan_limit_counts_as_zero() {
        let allowance = PlanAllowance::from_raw(
            Some(&SlotValue::Text(String::new())),
            &SlotValue::Number(2.0),
        );
        assert_eq!(allowance.job_limit, 0.0);
        assert_eq!(allowance.job_limit_total(), 2.0);
    }

    #[test]
    fn whole_counts_serialize_as_integers() {
        let whole = PlanAllowance::from_raw(Some(&SlotValue::Number(3.0)), &SlotValue::Missing);
        assert_eq!(
            serde_json::to_value(whole).expect("serializes"),
            json!({ "jobLimit": 3, "extraJobSlots": 0 })
        );

        let fractional =
            PlanAllowance::from_raw(Some(&SlotValue::Number(2.5)), &SlotValue::Missing);
        assert_eq!(
            serde_json::to_value(fractional).expect("serializes")["jobLimit"],
            json!(2.5)
        );
    }
}
