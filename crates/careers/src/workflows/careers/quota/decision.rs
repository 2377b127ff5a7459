use serde::Serialize;

use super::super::domain::CareerStatus;
use super::plan::serialize_count;

/// Point-in-time admission decision for publishing one more career.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaDecision {
    #[serde(serialize_with = "serialize_count")]
    pub job_limit_total: f64,
    pub active_count: u64,
    pub can_publish: bool,
}

impl QuotaDecision {
    pub fn evaluate(job_limit_total: f64, active_count: u64) -> Self {
        Self {
            job_limit_total,
            active_count,
            can_publish: (active_count as f64) < job_limit_total,
        }
    }

    /// Status the wizard persists: demoted to `Unpublished` instead of failing when full.
    pub fn wizard_status(&self) -> CareerStatus {
        if self.can_publish {
            CareerStatus::Published
        } else {
            CareerStatus::Unpublished
        }
    }

    /// Careers that can still be published; a fractional remainder admits one more.
    pub fn available_slots(&self) -> u64 {
        let remaining = self.job_limit_total - self.active_count as f64;
        if remaining > 0.0 {
            remaining.ceil() as u64
        } else {
            0
        }
    }
}
