//! Outcome resolver. Classifies a submitted application from the re-fetched profile.
//!
//! Pure: the caller fetches the profile, this module only reads it.

use serde::Serialize;

use crate::models::profile::UserProfile;

const QUALIFIED_STATUS: &str = "QUALIFIED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Outcome {
    InterviewEligible,
    UnderReview,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::InterviewEligible => "interview-eligible",
            Outcome::UnderReview => "under-review",
        }
    }
}

/// Interview-eligible only when the record for `job_id` is flagged qualified
/// *and* carries the qualified status; anything else, including a missing
/// record, is under review.
pub fn resolve_outcome(profile: &UserProfile, job_id: &str) -> Outcome {
    match profile.application_for(job_id) {
        Some(record)
            if record.qualified && record.status.trim().eq_ignore_ascii_case(QUALIFIED_STATUS) =>
        {
            Outcome::InterviewEligible
        }
        _ => Outcome::UnderReview,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::ApplicationRecord;

    fn profile(records: &[(&str, bool, &str)]) -> UserProfile {
        UserProfile {
            applications: records
                .iter()
                .map(|(job_id, qualified, status)| ApplicationRecord {
                    job_id: job_id.to_string(),
                    qualified: *qualified,
                    status: status.to_string(),
                })
                .collect(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn test_qualified_record_is_interview_eligible() {
        let p = profile(&[("J1", true, "QUALIFIED")]);
        assert_eq!(resolve_outcome(&p, "J1"), Outcome::InterviewEligible);
    }

    #[test]
    fn test_status_match_is_case_insensitive() {
        let p = profile(&[("J1", true, "qualified")]);
        assert_eq!(resolve_outcome(&p, "J1"), Outcome::InterviewEligible);
    }

    #[test]
    fn test_flag_without_status_is_under_review() {
        let p = profile(&[("J1", true, "PENDING")]);
        assert_eq!(resolve_outcome(&p, "J1"), Outcome::UnderReview);
    }

    #[test]
    fn test_status_without_flag_is_under_review() {
        let p = profile(&[("J1", false, "QUALIFIED")]);
        assert_eq!(resolve_outcome(&p, "J1"), Outcome::UnderReview);
    }

    #[test]
    fn test_missing_record_is_under_review() {
        let p = profile(&[("J2", true, "QUALIFIED")]);
        assert_eq!(resolve_outcome(&p, "J1"), Outcome::UnderReview);
        assert_eq!(resolve_outcome(&UserProfile::default(), "J1"), Outcome::UnderReview);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::InterviewEligible.label(), "interview-eligible");
        assert_eq!(
            serde_json::to_string(&Outcome::UnderReview).unwrap(),
            "\"under-review\""
        );
    }
}
