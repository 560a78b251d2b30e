use thiserror::Error;

use crate::models::application::ApplicationData;
use crate::models::step::Step;

/// A form problem that blocks leaving a step. Checked before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Enter a valid email address")]
    InvalidEmail,

    #[error("Minimum salary cannot be higher than maximum salary")]
    SalaryRange,
}

pub fn validate_step(step: Step, data: &ApplicationData) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match step {
        Step::PersonalInfo => {
            let personal = &data.personal_info;
            if personal.first_name.trim().is_empty() {
                errors.push(ValidationError::Required("First name"));
            }
            if personal.last_name.trim().is_empty() {
                errors.push(ValidationError::Required("Last name"));
            }
            let email = personal.email.trim();
            if email.is_empty() {
                errors.push(ValidationError::Required("Email"));
            } else if !looks_like_email(email) {
                errors.push(ValidationError::InvalidEmail);
            }
        }
        Step::Questions => {
            let questions = &data.questions;
            if let (Some(min), Some(max)) = (
                parse_amount(&questions.salary_min),
                parse_amount(&questions.salary_max),
            ) {
                if min > max {
                    errors.push(ValidationError::SalaryRange);
                }
            }
        }
        Step::Experience | Step::Disclosures | Step::Identity | Step::Review => {}
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Parses "$120,000"-style amounts; anything non-numeric is ignored.
fn parse_amount(value: &str) -> Option<u64> {
    let digits: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    digits.parse().ok()
}
