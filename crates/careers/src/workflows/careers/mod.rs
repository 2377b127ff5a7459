//! Career postings for the Add Career wizard, gated by the organization's job slot quota.

pub mod domain;
pub mod memory;
pub mod quota;
pub mod repository;
pub mod request;
pub mod router;
pub mod service;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    Career, CareerId, CareerPatch, CareerStatus, Editor, InterviewQuestionCategory, OrgId,
};
pub use memory::InMemoryCareerStore;
pub use quota::{
    PlanAllowance, QuotaDecision, QuotaError, QuotaEvaluator, QuotaSnapshot,
    DEFAULT_EXTRA_JOB_SLOTS, DEFAULT_PLAN_JOB_LIMIT,
};
pub use repository::{
    CareerStore, OrganizationProfile, OrganizationRecord, OrganizationStore, PlanRecord,
    RepositoryError, SlotValue,
};
pub use request::{
    AddCareerRequest, OrganizationQuery, PipelineCommand, PipelineEditRequest, SubmissionError,
    TeamCommand, TeamEditRequest, UpdateCareerRequest, WizardStepRequest,
};
pub use router::career_router;
pub use service::{
    CareerResponse, CareerService, CareerServiceError, CareerTotals, OrganizationDetails,
    WizardStepResponse, QUOTA_EXCEEDED_MESSAGE, STORAGE_UNREACHABLE_MESSAGE,
};
pub use wizard::WizardStep;
