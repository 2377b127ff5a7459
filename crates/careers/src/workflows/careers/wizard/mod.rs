//! Domain rules behind the five-step Add Career wizard.

pub mod details;
pub mod pipeline;
pub mod progress;
pub mod team;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wizard steps in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    CareerDetails,
    CvReview,
    AiInterview,
    PipelineStages,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::CareerDetails,
        WizardStep::CvReview,
        WizardStep::AiInterview,
        WizardStep::PipelineStages,
        WizardStep::Review,
    ];

    pub fn number(self) -> u8 {
        match self {
            WizardStep::CareerDetails => 1,
            WizardStep::CvReview => 2,
            WizardStep::AiInterview => 3,
            WizardStep::PipelineStages => 4,
            WizardStep::Review => 5,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::CareerDetails => "Career Details & Team Access",
            WizardStep::CvReview => "CV Review & Pre-screening",
            WizardStep::AiInterview => "AI Interview Setup",
            WizardStep::PipelineStages => "Pipeline Stages",
            WizardStep::Review => "Review Career",
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = UnknownStep;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.number() == value)
            .ok_or(UnknownStep(value))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStep(pub u8);

impl fmt::Display for UnknownStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wizard step must be between 1 and 5, got {}", self.0)
    }
}
