use std::fmt;

use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wizard::pipeline::PipelineStage;
use super::wizard::team::TeamMember;

/// Organization identifier. Always a well-formed 24 character hex ObjectId.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrgId(ObjectId);

impl OrgId {
    pub fn parse(raw: &str) -> Result<Self, InvalidIdentifier> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| InvalidIdentifier {
                raw: raw.to_string(),
            })
    }

    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

/// Raised when an organization id does not have the ObjectId shape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{raw}' is not a valid organization identifier")]
pub struct InvalidIdentifier {
    pub raw: String,
}

/// Identifier wrapper for persisted careers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CareerId(pub String);

impl CareerId {
    pub fn generate() -> Self {
        Self(ObjectId::new().to_hex())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CareerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Publication state of a career. `active` and `Published` both occupy a job slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CareerStatus {
    #[serde(rename = "active")]
    Active,
    Published,
    Unpublished,
}

impl CareerStatus {
    /// Statuses counted against an organization's job quota.
    pub const ACTIVE_SET: [CareerStatus; 2] = [CareerStatus::Active, CareerStatus::Published];

    pub fn label(self) -> &'static str {
        match self {
            CareerStatus::Active => "active",
            CareerStatus::Published => "Published",
            CareerStatus::Unpublished => "Unpublished",
        }
    }

    /// Stored label, matched without regard to case.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            CareerStatus::Active,
            CareerStatus::Published,
            CareerStatus::Unpublished,
        ]
        .into_iter()
        .find(|status| status.label().eq_ignore_ascii_case(label))
    }

    pub fn occupies_slot(self) -> bool {
        Self::ACTIVE_SET.contains(&self)
    }
}

impl fmt::Display for CareerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Recruiter recorded as creator or last editor of a career.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Editor {
    pub fn has_identity(&self) -> bool {
        self.email
            .as_deref()
            .map(|email| !email.trim().is_empty())
            .unwrap_or(false)
    }
}

/// AI interview questions grouped by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestionCategory {
    pub category_name: String,
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Job posting document as persisted by the career store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Career {
    pub id: CareerId,
    /// Raw organization reference as submitted; quota counting matches it verbatim.
    #[serde(rename = "orgID")]
    pub org_id: String,
    pub job_title: String,
    pub description: String,
    /// Screening questions as the client sent them.
    #[serde(default)]
    pub questions: Value,
    pub location: String,
    pub work_setup: String,
    pub work_setup_remarks: Option<String>,
    pub status: CareerStatus,
    pub created_by: Editor,
    pub last_edited_by: Editor,
    pub screening_setting: Option<Value>,
    pub require_video: bool,
    pub salary_negotiable: bool,
    pub minimum_salary: Option<f64>,
    pub maximum_salary: Option<f64>,
    pub country: Option<String>,
    pub province: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default)]
    pub team_access: Vec<TeamMember>,
    #[serde(default)]
    pub cv_screening: Option<String>,
    #[serde(default)]
    pub cv_secret_prompt: Option<String>,
    #[serde(default)]
    pub pre_screen_questions: Vec<String>,
    #[serde(default)]
    pub ai_screening: Option<String>,
    #[serde(default)]
    pub ai_interview_secret_prompt: Option<String>,
    #[serde(default)]
    pub ai_interview_questions: Vec<InterviewQuestionCategory>,
    #[serde(default)]
    pub pipeline_stages: Vec<PipelineStage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

impl Career {
    /// Blank career owned by `org_id`, used as the base the wizard fills in step by step.
    pub fn draft(
        id: CareerId,
        org_id: impl Into<String>,
        created_by: Editor,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            org_id: org_id.into(),
            job_title: String::new(),
            description: String::new(),
            questions: Value::Array(Vec::new()),
            location: String::new(),
            work_setup: String::new(),
            work_setup_remarks: None,
            status: CareerStatus::Unpublished,
            last_edited_by: created_by.clone(),
            created_by,
            screening_setting: None,
            require_video: false,
            salary_negotiable: false,
            minimum_salary: None,
            maximum_salary: None,
            country: None,
            province: None,
            employment_type: None,
            team_access: Vec::new(),
            cv_screening: None,
            cv_secret_prompt: None,
            pre_screen_questions: Vec::new(),
            ai_screening: None,
            ai_interview_secret_prompt: None,
            ai_interview_questions: Vec::new(),
            pipeline_stages: Vec::new(),
            created_at: now,
            updated_at: now,
            last_activity_at: now,
        }
    }

    /// Total number of AI interview questions across categories.
    pub fn interview_question_count(&self) -> usize {
        self.ai_interview_questions
            .iter()
            .map(|category| category.questions.len())
            .sum()
    }

    /// Merge a partial update, stamping the editor and activity timestamps.
    pub fn apply(&mut self, patch: CareerPatch, editor: Option<Editor>, now: DateTime<Utc>) {
        let CareerPatch {
            job_title,
            description,
            questions,
            location,
            work_setup,
            work_setup_remarks,
            status,
            screening_setting,
            require_video,
            salary_negotiable,
            minimum_salary,
            maximum_salary,
            country,
            province,
            employment_type,
            team_access,
            cv_screening,
            cv_secret_prompt,
            pre_screen_questions,
            ai_screening,
            ai_interview_secret_prompt,
            ai_interview_questions,
            pipeline_stages,
            last_edited_by,
        } = patch;

        assign(&mut self.job_title, job_title);
        assign(&mut self.description, description);
        assign(&mut self.questions, questions);
        assign(&mut self.location, location);
        assign(&mut self.work_setup, work_setup);
        assign(&mut self.status, status);
        assign(&mut self.require_video, require_video);
        assign(&mut self.salary_negotiable, salary_negotiable);
        assign(&mut self.team_access, team_access);
        assign(&mut self.pre_screen_questions, pre_screen_questions);
        assign(&mut self.ai_interview_questions, ai_interview_questions);
        assign(&mut self.pipeline_stages, pipeline_stages);

        if let Some(remarks) = work_setup_remarks {
            self.work_setup_remarks = non_blank(remarks);
        }
        if screening_setting.is_some() {
            self.screening_setting = screening_setting;
        }
        if minimum_salary.is_some() {
            self.minimum_salary = minimum_salary;
        }
        if maximum_salary.is_some() {
            self.maximum_salary = maximum_salary;
        }
        replace_text(&mut self.country, country);
        replace_text(&mut self.province, province);
        replace_text(&mut self.employment_type, employment_type);
        replace_text(&mut self.cv_screening, cv_screening);
        replace_text(&mut self.cv_secret_prompt, cv_secret_prompt);
        replace_text(&mut self.ai_screening, ai_screening);
        replace_text(&mut self.ai_interview_secret_prompt, ai_interview_secret_prompt);

        if let Some(editor) = last_edited_by.or(editor) {
            self.last_edited_by = editor;
        }
        self.updated_at = now;
        self.last_activity_at = now;
    }
}

fn assign<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn replace_text(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = non_blank(value);
    }
}

pub(crate) fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Partial career update accepted by the update and wizard endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerPatch {
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub questions: Option<Value>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub work_setup: Option<String>,
    #[serde(default)]
    pub work_setup_remarks: Option<String>,
    #[serde(default)]
    pub status: Option<CareerStatus>,
    #[serde(default)]
    pub screening_setting: Option<Value>,
    #[serde(default)]
    pub require_video: Option<bool>,
    #[serde(default)]
    pub salary_negotiable: Option<bool>,
    #[serde(default)]
    pub minimum_salary: Option<f64>,
    #[serde(default)]
    pub maximum_salary: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub team_access: Option<Vec<TeamMember>>,
    #[serde(default)]
    pub cv_screening: Option<String>,
    #[serde(default)]
    pub cv_secret_prompt: Option<String>,
    #[serde(default)]
    pub pre_screen_questions: Option<Vec<String>>,
    #[serde(default)]
    pub ai_screening: Option<String>,
    #[serde(default)]
    pub ai_interview_secret_prompt: Option<String>,
    #[serde(default)]
    pub ai_interview_questions: Option<Vec<InterviewQuestionCategory>>,
    #[serde(default)]
    pub pipeline_stages: Option<Vec<PipelineStage>>,
    #[serde(default)]
    pub last_edited_by: Option<Editor>,
}
