use std::collections::BTreeMap;

use super::super::domain::Career;

pub const REQUIRED_FIELD: &str = "This is a required field.";
pub const SALARY_RANGE_INVERTED: &str = "Maximum must be greater than minimum.";

/// Field name to message for every step-one problem found.
pub type DetailErrors = BTreeMap<&'static str, &'static str>;

/// Validate the "Career Details" step of a career draft.
pub fn validate(career: &Career) -> Result<(), DetailErrors> {
    let mut errors = DetailErrors::new();

    if career.job_title.trim().is_empty() {
        errors.insert("jobTitle", REQUIRED_FIELD);
    }
    if is_blank(career.employment_type.as_deref()) {
        errors.insert("employmentType", REQUIRED_FIELD);
    }
    if career.work_setup.trim().is_empty() {
        errors.insert("workSetup", REQUIRED_FIELD);
    }
    if is_blank(career.province.as_deref()) {
        errors.insert("province", REQUIRED_FIELD);
    }
    if career.location.trim().is_empty() {
        errors.insert("location", REQUIRED_FIELD);
    }

    if !career.salary_negotiable {
        match (career.minimum_salary, career.maximum_salary) {
            (Some(min), Some(max)) => {
                if max < min {
                    errors.insert("maximumSalary", SALARY_RANGE_INVERTED);
                }
            }
            (min, max) => {
                if min.is_none() {
                    errors.insert("minimumSalary", REQUIRED_FIELD);
                }
                if max.is_none() {
                    errors.insert("maximumSalary", REQUIRED_FIELD);
                }
            }
        }
    }

    if career.description.trim().is_empty() {
        errors.insert("description", REQUIRED_FIELD);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Step-one checks the progress bar counts, in display order.
pub(crate) fn completion_checks(career: &Career) -> [bool; 7] {
    [
        !career.job_title.trim().is_empty(),
        !is_blank(career.employment_type.as_deref()),
        !career.work_setup.trim().is_empty(),
        !is_blank(career.province.as_deref()),
        !career.location.trim().is_empty(),
        career.salary_negotiable
            || (career.minimum_salary.is_some() && career.maximum_salary.is_some()),
        !career.description.trim().is_empty(),
    ]
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|text| text.trim().is_empty()).unwrap_or(true)
}
