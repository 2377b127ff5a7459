use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use super::domain::{non_blank, Career, CareerId, CareerPatch, CareerStatus, Editor};
use super::wizard::team::{TeamMember, TeamRole};
use super::wizard::WizardStep;

/// Body of `POST /api/add-career`. Field types are loose because older clients
/// post form state verbatim; [`AddCareerRequest::validate`] tightens them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCareerRequest {
    #[serde(default)]
    pub job_title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub questions: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub work_setup: Option<Value>,
    #[serde(default, rename = "orgID")]
    pub org_id: Option<Value>,
    #[serde(default)]
    pub created_by: Option<Value>,
    #[serde(default)]
    pub last_edited_by: Option<Value>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub work_setup_remarks: Option<String>,
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub screening_setting: Option<Value>,
    #[serde(default, deserialize_with = "truthy")]
    pub require_video: bool,
    #[serde(default, deserialize_with = "truthy")]
    pub salary_negotiable: bool,
    #[serde(default, deserialize_with = "number_or_none")]
    pub minimum_salary: Option<f64>,
    #[serde(default, deserialize_with = "number_or_none")]
    pub maximum_salary: Option<f64>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub province: Option<String>,
    #[serde(default, deserialize_with = "text_or_none")]
    pub employment_type: Option<String>,
    #[serde(default, deserialize_with = "array_or_empty")]
    pub team_access: Vec<TeamMember>,
}

/// Why an add-career body was turned away before reaching the quota check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("Invalid status '{0}'")]
    UnknownStatus(String),
}

/// Add-career request with every required field present.
#[derive(Debug, Clone)]
pub struct CareerSubmission {
    pub org_id: String,
    pub job_title: String,
    pub description: String,
    pub questions: Value,
    pub location: String,
    pub work_setup: String,
    pub created_by: Editor,
    pub status: CareerStatus,
    rest: AddCareerRequest,
}

impl AddCareerRequest {
    /// Required fields in the order they are checked.
    pub const REQUIRED: [&'static str; 7] = [
        "jobTitle",
        "description",
        "questions",
        "location",
        "workSetup",
        "orgID",
        "createdBy",
    ];

    /// Check required fields, reporting the first missing one by its wire name.
    /// Missing, `null`, `""`, `false` and `0` all count as missing.
    pub fn validate(mut self) -> Result<CareerSubmission, SubmissionError> {
        let job_title = take_present(&mut self.job_title, Self::REQUIRED[0])?;
        let description = take_present(&mut self.description, Self::REQUIRED[1])?;
        let questions = take_present(&mut self.questions, Self::REQUIRED[2])?;
        let location = take_present(&mut self.location, Self::REQUIRED[3])?;
        let work_setup = take_present(&mut self.work_setup, Self::REQUIRED[4])?;
        let org_id = take_present(&mut self.org_id, Self::REQUIRED[5])?;
        let created_by = take_present(&mut self.created_by, Self::REQUIRED[6])?;
        let status = status_or_active(self.status.take())?;

        Ok(CareerSubmission {
            org_id: into_text(org_id),
            job_title: into_text(job_title),
            description: into_text(description),
            questions,
            location: into_text(location),
            work_setup: into_text(work_setup),
            created_by: editor_from(created_by),
            status,
            rest: self,
        })
    }
}

impl CareerSubmission {
    pub fn into_career(self, id: CareerId, now: DateTime<Utc>) -> Career {
        let CareerSubmission {
            org_id,
            job_title,
            description,
            questions,
            location,
            work_setup,
            created_by,
            status,
            rest,
        } = self;

        let mut career = Career::draft(id, org_id, created_by, now);
        if let Some(editor) = rest.last_edited_by.filter(is_truthy) {
            career.last_edited_by = editor_from(editor);
        }
        career.job_title = job_title;
        career.description = description;
        career.questions = questions;
        career.location = location;
        career.work_setup = work_setup;
        career.work_setup_remarks = rest.work_setup_remarks;
        career.status = status;
        career.screening_setting = rest.screening_setting.filter(|value| !value.is_null());
        career.require_video = rest.require_video;
        career.salary_negotiable = rest.salary_negotiable;
        career.minimum_salary = rest.minimum_salary;
        career.maximum_salary = rest.maximum_salary;
        career.country = rest.country;
        career.province = rest.province;
        career.employment_type = rest.employment_type;
        career.team_access = rest.team_access;
        career
    }
}

fn take_present(slot: &mut Option<Value>, field: &'static str) -> Result<Value, SubmissionError> {
    slot.take()
        .filter(is_truthy)
        .ok_or(SubmissionError::Missing(field))
}

/// Strings pass through; any other scalar is kept in its JSON spelling.
fn into_text(value: Value) -> String {
    match value {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn editor_from(value: Value) -> Editor {
    match value {
        Value::Object(fields) => Editor {
            name: field_text(&fields, "name"),
            email: field_text(&fields, "email"),
            image: field_text(&fields, "image"),
        },
        Value::String(text) if text.contains('@') => Editor {
            email: Some(text),
            ..Editor::default()
        },
        Value::String(text) => Editor {
            name: Some(text),
            ..Editor::default()
        },
        _ => Editor::default(),
    }
}

fn field_text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields.get(key).and_then(Value::as_str).map(str::to_string)
}

fn status_or_active(value: Option<Value>) -> Result<CareerStatus, SubmissionError> {
    let Some(value) = value.filter(is_truthy) else {
        return Ok(CareerStatus::Active);
    };
    let label = into_text(value);
    CareerStatus::from_label(&label).ok_or(SubmissionError::UnknownStatus(label))
}

/// Body of the wizard's "save and continue" and "save as unpublished" actions.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStepRequest {
    pub step: WizardStep,
    #[serde(default, alias = "_id")]
    pub career_id: Option<CareerId>,
    #[serde(default, rename = "orgID")]
    pub org_id: String,
    #[serde(default)]
    pub editor: Editor,
    #[serde(flatten)]
    pub patch: CareerPatch,
}

/// Body of `POST /api/update-career`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCareerRequest {
    #[serde(rename = "_id", alias = "careerId")]
    pub career_id: CareerId,
    #[serde(flatten)]
    pub patch: CareerPatch,
}

/// Body of `POST /api/careers/:career_id/pipeline`.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineEditRequest {
    #[serde(default)]
    pub editor: Option<Editor>,
    #[serde(flatten)]
    pub command: PipelineCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PipelineCommand {
    AddStage {
        #[serde(default)]
        title: Option<String>,
    },
    RemoveStage {
        #[serde(rename = "stageId")]
        stage_id: String,
    },
    /// Drag `stage_id` into the slot held by `target_id`.
    MoveStage {
        #[serde(rename = "stageId")]
        stage_id: String,
        #[serde(rename = "targetId")]
        target_id: String,
    },
}

/// Body of `POST /api/careers/:career_id/team`.
#[derive(Debug, Clone, Deserialize)]
pub struct TeamEditRequest {
    #[serde(default)]
    pub editor: Option<Editor>,
    #[serde(flatten)]
    pub command: TeamCommand,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum TeamCommand {
    AddMember {
        #[serde(rename = "memberId")]
        member_id: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
    },
    UpdateRole {
        #[serde(rename = "memberId")]
        member_id: String,
        role: TeamRole,
    },
    RemoveMember {
        #[serde(rename = "memberId")]
        member_id: String,
    },
}

/// Query and body carrying an organization id.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationQuery {
    #[serde(default, rename = "orgID")]
    pub org_id: String,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0 && !n.is_nan()).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value)
        .filter(is_truthy)
        .map(into_text)
        .and_then(non_blank))
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn array_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(Vec::new()),
    }
}
