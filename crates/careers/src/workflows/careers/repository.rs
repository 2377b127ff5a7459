use async_trait::async_trait;

use super::domain::{Career, CareerId, CareerStatus, OrgId};

/// Raw numeric field as found in storage. Plan limits and extra slots have been
/// written by several generations of tooling, so the stored type is not trusted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SlotValue {
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Other,
}

impl SlotValue {
    /// Numeric reading of the value, or `fallback` when missing or non-numeric.
    /// Numeric strings count as numbers and blank text reads as zero. Fractions are kept.
    pub fn coerce(&self, fallback: f64) -> f64 {
        let parsed = match self {
            SlotValue::Number(value) => Some(*value),
            SlotValue::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    Some(0.0)
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            SlotValue::Missing | SlotValue::Other => None,
        };

        parsed.filter(|value| value.is_finite()).unwrap_or(fallback)
    }
}

impl From<f64> for SlotValue {
    fn from(value: f64) -> Self {
        SlotValue::Number(value)
    }
}

impl From<i64> for SlotValue {
    fn from(value: i64) -> Self {
        SlotValue::Number(value as f64)
    }
}

impl From<&str> for SlotValue {
    fn from(value: &str) -> Self {
        SlotValue::Text(value.to_string())
    }
}

/// Subscription plan document.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRecord {
    pub id: String,
    pub job_limit: SlotValue,
}

/// Organization document, with its plan reference normalised to a string.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationRecord {
    pub id: OrgId,
    pub plan_id: Option<String>,
    pub extra_job_slots: SlotValue,
}

/// Organization joined with its plan, if the plan reference resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationProfile {
    pub organization: OrganizationRecord,
    pub plan: Option<PlanRecord>,
}

/// Compare plan identifiers the way mixed ObjectId/string storage requires.
pub fn plan_ids_match(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

/// Read access to organizations and their subscription plans.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    async fn organization_profile(
        &self,
        org_id: &OrgId,
    ) -> Result<Option<OrganizationProfile>, RepositoryError>;
}

/// Storage abstraction for career documents.
#[async_trait]
pub trait CareerStore: Send + Sync {
    /// Count careers whose stored organization reference equals `org_ref` exactly
    /// and whose status is one of `statuses`.
    async fn count_by_status(
        &self,
        org_ref: &str,
        statuses: &[CareerStatus],
    ) -> Result<u64, RepositoryError>;
    async fn insert(&self, career: Career) -> Result<Career, RepositoryError>;
    async fn update(&self, career: Career) -> Result<(), RepositoryError>;
    async fn fetch(&self, id: &CareerId) -> Result<Option<Career>, RepositoryError>;
}

const TRANSPORT_MARKERS: [&str; 4] = [
    "timeout",
    "econnrefused",
    "mongonetworkerror",
    "mongonetworktimeouterror",
];

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("storage unreachable: {0}")]
    Transport(String),
    #[error("{0}")]
    Backend(String),
}

impl RepositoryError {
    /// Classify a backend failure from its message. Network and timeout failures
    /// become [`RepositoryError::Transport`]; everything else keeps its message.
    pub fn from_backend_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_transport_failure(&message) {
            RepositoryError::Transport(message)
        } else {
            RepositoryError::Backend(message)
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RepositoryError::Transport(_))
    }
}

pub fn is_transport_failure(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    TRANSPORT_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
