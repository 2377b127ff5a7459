use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

const CUSTOM_STAGE_TITLE: &str = "Custom Stage Example";
const CUSTOM_SUBSTAGES: [&str; 2] = ["Waiting Interview", "For Review"];

/// One column of the hiring pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineStage {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub core: bool,
    #[serde(default)]
    pub substages: Vec<String>,
}

impl PipelineStage {
    fn core_stage(id: &str, title: &str, substages: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            locked: true,
            core: true,
            substages: substages.iter().map(|stage| stage.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("pipeline stage '{0}' does not exist")]
    UnknownStage(String),
    #[error("core pipeline stage '{0}' cannot be removed")]
    CoreStageLocked(String),
    #[error("pipeline is missing core stage '{0}'")]
    MissingCoreStage(String),
}

/// Ordered pipeline for one career.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<PipelineStage>,
}

impl Pipeline {
    /// Core stages every career starts with.
    pub fn standard() -> Self {
        Self {
            stages: vec![
                PipelineStage::core_stage(
                    "cv-screening",
                    "CV Screening",
                    &["Waiting Submission", "For Review"],
                ),
                PipelineStage::core_stage(
                    "ai-interview",
                    "AI Interview",
                    &["Waiting Interview", "For Review"],
                ),
                PipelineStage::core_stage(
                    "final-human",
                    "Final Human Interview",
                    &["Waiting Schedule", "Waiting Interview", "For Review"],
                ),
                PipelineStage::core_stage(
                    "job-offer",
                    "Job Offer",
                    &[
                        "For Final Review",
                        "Waiting Offer Acceptance",
                        "For Contract Signing",
                        "Hired",
                    ],
                ),
            ],
        }
    }

    /// Accept a submitted stage list if it still carries every core stage.
    pub fn from_stages(stages: Vec<PipelineStage>) -> Result<Self, PipelineError> {
        for core in Self::standard().stages {
            if !stages.iter().any(|stage| stage.id == core.id) {
                return Err(PipelineError::MissingCoreStage(core.id));
            }
        }
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<PipelineStage> {
        self.stages
    }

    pub fn core_count(&self) -> usize {
        self.stages.iter().filter(|stage| stage.locked).count()
    }

    /// Append a custom stage. Ids are ObjectIds so they stay unique across restarts.
    pub fn add_custom_stage(&mut self, title: Option<&str>) -> &PipelineStage {
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .unwrap_or(CUSTOM_STAGE_TITLE);
        self.stages.push(PipelineStage {
            id: ObjectId::new().to_hex(),
            title: title.to_string(),
            locked: false,
            core: false,
            substages: CUSTOM_SUBSTAGES.iter().map(|s| s.to_string()).collect(),
        });
        &self.stages[self.stages.len() - 1]
    }

    pub fn remove_custom_stage(&mut self, id: &str) -> Result<PipelineStage, PipelineError> {
        let index = self.position(id)?;
        if self.stages[index].core {
            return Err(PipelineError::CoreStageLocked(id.to_string()));
        }
        Ok(self.stages.remove(index))
    }

    /// Move `dragged` into the slot currently held by `target`.
    pub fn move_stage(&mut self, dragged: &str, target: &str) -> Result<(), PipelineError> {
        let from = self.position(dragged)?;
        let to = self.position(target)?;
        if from != to {
            let stage = self.stages.remove(from);
            self.stages.insert(to, stage);
        }
        Ok(())
    }

    fn position(&self, id: &str) -> Result<usize, PipelineError> {
        self.stages
            .iter()
            .position(|stage| stage.id == id)
            .ok_or_else(|| PipelineError::UnknownStage(id.to_string()))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}
