use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{Career, CareerId, CareerPatch, CareerStatus, Editor};
use super::quota::plan::serialize_count;
use super::quota::{PlanAllowance, QuotaError, QuotaEvaluator, QuotaSnapshot};
use super::repository::{CareerStore, OrganizationStore, RepositoryError};
use super::request::{
    AddCareerRequest, PipelineCommand, PipelineEditRequest, SubmissionError, TeamCommand,
    TeamEditRequest, UpdateCareerRequest, WizardStepRequest,
};
use super::wizard::details::{self, DetailErrors};
use super::wizard::pipeline::{Pipeline, PipelineError};
use super::wizard::progress::{wizard_progress, StepProgress};
use super::wizard::team::{TeamError, TeamRoster};
use super::wizard::WizardStep;

pub const QUOTA_EXCEEDED_MESSAGE: &str = "You have reached the maximum number of jobs for your plan";
pub const STORAGE_UNREACHABLE_MESSAGE: &str =
    "Database connection failed. Check your MONGODB_URI and network connectivity.";

/// Response for any operation that persists a career.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerResponse {
    pub message: String,
    pub career_id: CareerId,
    pub career: Career,
}

/// Response for the wizard's save actions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStepResponse {
    pub message: String,
    pub career_id: CareerId,
    pub status: CareerStatus,
    pub job_limit_reached: bool,
    pub progress: Vec<StepProgress>,
    pub career: Career,
}

/// Plan allowance exposed for the organization details lookup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationDetails {
    #[serde(rename = "orgID")]
    pub org_id: String,
    #[serde(flatten)]
    pub allowance: PlanAllowance,
    #[serde(serialize_with = "serialize_count")]
    pub job_limit_total: f64,
}

/// Active career totals used by the wizard to preview the publish decision.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerTotals {
    #[serde(rename = "orgID")]
    pub org_id: String,
    pub total_active_careers: u64,
    #[serde(serialize_with = "serialize_count")]
    pub job_limit_total: f64,
    pub available_job_slots: u64,
}

/// Error raised by the career service.
#[derive(Debug, thiserror::Error)]
pub enum CareerServiceError {
    #[error(transparent)]
    Submission(#[from] SubmissionError),
    #[error("Please complete required fields.")]
    IncompleteStep(DetailErrors),
    #[error("Missing organization or user context")]
    MissingContext,
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Team(#[from] TeamError),
    #[error("Invalid orgID")]
    InvalidIdentifier,
    #[error("Organization not found")]
    OrganizationNotFound,
    #[error("Career not found")]
    CareerNotFound,
    #[error("You have reached the maximum number of jobs for your plan")]
    QuotaExceeded,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CareerServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CareerServiceError::Submission(_)
            | CareerServiceError::IncompleteStep(_)
            | CareerServiceError::MissingContext
            | CareerServiceError::Pipeline(_)
            | CareerServiceError::Team(_)
            | CareerServiceError::InvalidIdentifier
            | CareerServiceError::QuotaExceeded => StatusCode::BAD_REQUEST,
            CareerServiceError::OrganizationNotFound | CareerServiceError::CareerNotFound => {
                StatusCode::NOT_FOUND
            }
            CareerServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the recruiter.
    pub fn public_message(&self) -> String {
        match self {
            CareerServiceError::Repository(err) if err.is_transport() => {
                STORAGE_UNREACHABLE_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<QuotaError> for CareerServiceError {
    fn from(value: QuotaError) -> Self {
        match value {
            QuotaError::InvalidIdentifier => CareerServiceError::InvalidIdentifier,
            QuotaError::OrganizationNotFound => CareerServiceError::OrganizationNotFound,
            QuotaError::Repository(err) => CareerServiceError::Repository(err),
        }
    }
}

/// Service composing the quota check, career store, and wizard rules.
pub struct CareerService<O, C> {
    quota: QuotaEvaluator<O, C>,
    careers: Arc<C>,
}

impl<O, C> CareerService<O, C>
where
    O: OrganizationStore + 'static,
    C: CareerStore + 'static,
{
    pub fn new(organizations: Arc<O>, careers: Arc<C>) -> Self {
        Self {
            quota: QuotaEvaluator::new(organizations, careers.clone()),
            careers,
        }
    }

    /// Create a career outright. A full organization is a hard failure and nothing is stored.
    pub async fn add_career(
        &self,
        request: AddCareerRequest,
    ) -> Result<CareerResponse, CareerServiceError> {
        let submission = request.validate()?;

        let snapshot = self.quota.evaluate(&submission.org_id).await?;
        if !snapshot.decision.can_publish {
            warn!(
                org_id = %snapshot.org_id,
                active = snapshot.decision.active_count,
                limit = snapshot.decision.job_limit_total,
                "career rejected: job limit reached"
            );
            return Err(CareerServiceError::QuotaExceeded);
        }

        let career = submission.into_career(CareerId::generate(), Utc::now());
        let stored = self.careers.insert(career).await?;
        info!(
            career_id = %stored.id,
            org_id = %stored.org_id,
            status = %stored.status,
            "career added"
        );

        Ok(CareerResponse {
            message: "Career added successfully".to_string(),
            career_id: stored.id.clone(),
            career: stored,
        })
    }

    /// Wizard "save and continue": creates the draft on first save, updates it afterwards.
    /// When the organization is full the career is kept as `Unpublished` instead of failing.
    pub async fn save_wizard_step(
        &self,
        request: WizardStepRequest,
    ) -> Result<WizardStepResponse, CareerServiceError> {
        self.persist_step(request, StatusPolicy::QuotaDecided).await
    }

    /// Wizard "save as unpublished": persists the step without consulting the quota.
    pub async fn save_as_unpublished(
        &self,
        request: WizardStepRequest,
    ) -> Result<WizardStepResponse, CareerServiceError> {
        self.persist_step(request, StatusPolicy::Unpublished).await
    }

    /// Partial update by id. Moving an unpublished career into an active status is quota checked.
    pub async fn update_career(
        &self,
        request: UpdateCareerRequest,
    ) -> Result<CareerResponse, CareerServiceError> {
        let UpdateCareerRequest { career_id, patch } = request;
        let mut career = self.load(&career_id).await?;
        let was_active = career.status.occupies_slot();

        check_patch(&patch)?;
        career.apply(patch, None, Utc::now());

        if !was_active && career.status.occupies_slot() {
            let snapshot = self.quota.evaluate(&career.org_id).await?;
            if !snapshot.decision.can_publish {
                warn!(career_id = %career.id, "publish rejected: job limit reached");
                return Err(CareerServiceError::QuotaExceeded);
            }
        }

        self.careers
            .update(career.clone())
            .await
            .map_err(not_found_as_career)?;
        info!(career_id = %career.id, status = %career.status, "career updated");

        Ok(CareerResponse {
            message: "Career updated successfully".to_string(),
            career_id: career.id.clone(),
            career,
        })
    }

    /// Add, remove or reorder pipeline stages. Core stages cannot be removed.
    pub async fn edit_pipeline(
        &self,
        career_id: &CareerId,
        request: PipelineEditRequest,
    ) -> Result<CareerResponse, CareerServiceError> {
        let PipelineEditRequest { editor, command } = request;
        let career = self.load(career_id).await?;
        let mut pipeline = if career.pipeline_stages.is_empty() {
            Pipeline::standard()
        } else {
            Pipeline::from_stages(career.pipeline_stages.clone())?
        };

        match command {
            PipelineCommand::AddStage { title } => {
                pipeline.add_custom_stage(title.as_deref());
            }
            PipelineCommand::RemoveStage { stage_id } => {
                pipeline.remove_custom_stage(&stage_id)?;
            }
            PipelineCommand::MoveStage {
                stage_id,
                target_id,
            } => pipeline.move_stage(&stage_id, &target_id)?,
        }

        let patch = CareerPatch {
            pipeline_stages: Some(pipeline.into_stages()),
            ..CareerPatch::default()
        };
        self.save_edit(career, patch, editor, "Pipeline updated successfully")
            .await
    }

    /// Add members, change roles or remove members. The roster must keep a job owner.
    pub async fn edit_team(
        &self,
        career_id: &CareerId,
        request: TeamEditRequest,
    ) -> Result<CareerResponse, CareerServiceError> {
        let TeamEditRequest { editor, command } = request;
        let career = self.load(career_id).await?;
        let mut roster = TeamRoster::from_members(career.team_access.clone());

        match command {
            TeamCommand::AddMember {
                member_id,
                name,
                email,
            } => {
                roster.add_member(&member_id, &name, &email);
            }
            TeamCommand::UpdateRole { member_id, role } => roster.update_role(&member_id, role)?,
            TeamCommand::RemoveMember { member_id } => {
                roster.remove_member(&member_id)?;
            }
        }
        roster.validate()?;

        let patch = CareerPatch {
            team_access: Some(roster.into_members()),
            ..CareerPatch::default()
        };
        self.save_edit(career, patch, editor, "Team access updated successfully")
            .await
    }

    pub async fn get_career(&self, career_id: &CareerId) -> Result<Career, CareerServiceError> {
        self.load(career_id).await
    }

    pub async fn organization_details(
        &self,
        raw_org_id: &str,
    ) -> Result<OrganizationDetails, CareerServiceError> {
        let (_, allowance) = self.quota.plans().resolve_raw(raw_org_id).await?;
        Ok(OrganizationDetails {
            org_id: raw_org_id.to_string(),
            allowance,
            job_limit_total: allowance.job_limit_total(),
        })
    }

    pub async fn career_totals(&self, raw_org_id: &str) -> Result<CareerTotals, CareerServiceError> {
        let QuotaSnapshot { decision, .. } = self.quota.evaluate(raw_org_id).await?;
        Ok(CareerTotals {
            org_id: raw_org_id.to_string(),
            total_active_careers: decision.active_count,
            job_limit_total: decision.job_limit_total,
            available_job_slots: decision.available_slots(),
        })
    }

    async fn load(&self, career_id: &CareerId) -> Result<Career, CareerServiceError> {
        self.careers
            .fetch(career_id)
            .await?
            .ok_or(CareerServiceError::CareerNotFound)
    }

    async fn save_edit(
        &self,
        mut career: Career,
        patch: CareerPatch,
        editor: Option<Editor>,
        message: &str,
    ) -> Result<CareerResponse, CareerServiceError> {
        career.apply(patch, editor.filter(Editor::has_identity), Utc::now());
        self.careers
            .update(career.clone())
            .await
            .map_err(not_found_as_career)?;
        info!(career_id = %career.id, "{message}");

        Ok(CareerResponse {
            message: message.to_string(),
            career_id: career.id.clone(),
            career,
        })
    }

    async fn persist_step(
        &self,
        request: WizardStepRequest,
        policy: StatusPolicy,
    ) -> Result<WizardStepResponse, CareerServiceError> {
        let WizardStepRequest {
            step,
            career_id,
            org_id,
            editor,
            mut patch,
        } = request;

        if org_id.trim().is_empty() || !editor.has_identity() {
            return Err(CareerServiceError::MissingContext);
        }
        patch.status = None;
        check_patch(&patch)?;

        let now = Utc::now();
        let (mut career, is_new) = match career_id {
            Some(id) => {
                let existing = self.load(&id).await?;
                if existing.org_id != org_id {
                    return Err(CareerServiceError::CareerNotFound);
                }
                (existing, false)
            }
            None => {
                let mut draft = Career::draft(CareerId::generate(), org_id, editor.clone(), now);
                draft.pipeline_stages = Pipeline::standard().into_stages();
                draft.team_access = TeamRoster::owned_by(&editor).into_members();
                (draft, true)
            }
        };

        career.apply(patch, Some(editor), now);

        if is_new || step == WizardStep::CareerDetails {
            details::validate(&career).map_err(CareerServiceError::IncompleteStep)?;
        }

        let mut job_limit_reached = false;
        career.status = match policy {
            StatusPolicy::Unpublished => CareerStatus::Unpublished,
            StatusPolicy::QuotaDecided if !is_new && career.status.occupies_slot() => career.status,
            StatusPolicy::QuotaDecided => {
                let snapshot = self.quota.evaluate(&career.org_id).await?;
                job_limit_reached = !snapshot.decision.can_publish;
                snapshot.decision.wizard_status()
            }
        };

        let message = if is_new {
            self.careers.insert(career.clone()).await?;
            if job_limit_reached {
                "Job limit reached. Saved as Unpublished."
            } else if career.status.occupies_slot() {
                "Career published successfully!"
            } else {
                "Career saved successfully!"
            }
        } else {
            self.careers
                .update(career.clone())
                .await
                .map_err(not_found_as_career)?;
            if job_limit_reached {
                "Job limit reached. Saved as Unpublished."
            } else {
                "Career saved successfully!"
            }
        };

        info!(
            career_id = %career.id,
            step = step.number(),
            status = %career.status,
            created = is_new,
            job_limit_reached,
            "wizard step saved"
        );

        Ok(WizardStepResponse {
            message: message.to_string(),
            career_id: career.id.clone(),
            status: career.status,
            job_limit_reached,
            progress: wizard_progress(&career, step),
            career,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusPolicy {
    QuotaDecided,
    Unpublished,
}

fn check_patch(patch: &CareerPatch) -> Result<(), CareerServiceError> {
    if let Some(stages) = &patch.pipeline_stages {
        Pipeline::from_stages(stages.clone())?;
    }
    if let Some(members) = &patch.team_access {
        TeamRoster::from_members(members.clone()).validate()?;
    }
    Ok(())
}

fn not_found_as_career(err: RepositoryError) -> CareerServiceError {
    match err {
        RepositoryError::NotFound => CareerServiceError::CareerNotFound,
        other => CareerServiceError::Repository(other),
    }
}

