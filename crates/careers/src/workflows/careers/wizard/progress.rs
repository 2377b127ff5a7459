use serde::Serialize;

use super::super::domain::Career;
use super::details::completion_checks;
use super::WizardStep;

/// Ceiling for the partially-filled configuration steps until they are saved.
const CONFIG_STEP_CAP: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepProgress {
    pub number: u8,
    pub title: &'static str,
    pub percent: u8,
}

pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

pub fn career_details_percent(career: &Career) -> u8 {
    let checks = completion_checks(career);
    let satisfied = checks.iter().filter(|check| **check).count();
    clamp_percent(satisfied as f64 / checks.len() as f64 * 100.0)
}

/// 25 for a CV secret prompt, 25 for any pre-screening question.
pub fn cv_review_percent(career: &Career) -> u8 {
    let secret: f64 = if has_text(career.cv_secret_prompt.as_deref()) {
        25.0
    } else {
        0.0
    };
    let questions: f64 = if career.pre_screen_questions.is_empty() {
        0.0
    } else {
        25.0
    };
    clamp_percent((secret + questions).min(CONFIG_STEP_CAP))
}

/// 25 for an interview secret prompt, 10 per question up to 25.
pub fn ai_interview_percent(career: &Career) -> u8 {
    let secret = if has_text(career.ai_interview_secret_prompt.as_deref()) {
        25.0
    } else {
        0.0
    };
    let questions = (career.interview_question_count() as f64 * 10.0).min(25.0);
    clamp_percent((secret + questions).min(CONFIG_STEP_CAP))
}

/// Progress for every step after `completed` has been saved.
pub fn wizard_progress(career: &Career, completed: WizardStep) -> Vec<StepProgress> {
    WizardStep::ALL
        .into_iter()
        .map(|step| {
            let percent = if step <= completed {
                100
            } else {
                match step {
                    WizardStep::CareerDetails => career_details_percent(career),
                    WizardStep::CvReview => cv_review_percent(career),
                    WizardStep::AiInterview => ai_interview_percent(career),
                    WizardStep::PipelineStages | WizardStep::Review => 0,
                }
            };
            StepProgress {
                number: step.number(),
                title: step.title(),
                percent,
            }
        })
        .collect()
}

fn has_text(value: Option<&str>) -> bool {
    value.map(|text| !text.trim().is_empty()).unwrap_or(false)
}
