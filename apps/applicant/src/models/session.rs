use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The resumable part of an in-progress application, as kept in client storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSession {
    pub application_id: String,
    pub current_step: u8,
    #[serde(default)]
    pub prefill_data: Option<Value>,
    /// Absent in sessions written before job scoping was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl ApplicationSession {
    /// Whether this stored session may be resumed for `job_id`.
    pub fn belongs_to(&self, job_id: &str) -> bool {
        self.job_id.as_deref().map_or(true, |id| id == job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_uses_camel_case_keys() {
        let session = ApplicationSession {
            application_id: "app-1".to_string(),
            current_step: 2,
            prefill_data: Some(json!({"technical_skills": "Python"})),
            job_id: Some("J1".to_string()),
        };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["applicationId"], "app-1");
        assert_eq!(value["currentStep"], 2);
        assert_eq!(value["prefillData"]["technical_skills"], "Python");
        assert_eq!(value["jobId"], "J1");
    }

    #[test]
    fn test_legacy_session_without_job_belongs_to_any_job() {
        let session: ApplicationSession =
            serde_json::from_str(r#"{"applicationId":"a","currentStep":3}"#).unwrap();
        assert!(session.prefill_data.is_none());
        assert!(session.belongs_to("J9"));
    }

    #[test]
    fn test_session_scoped_to_its_job() {
        let session = ApplicationSession {
            application_id: "a".to_string(),
            current_step: 1,
            prefill_data: None,
            job_id: Some("J1".to_string()),
        };
        assert!(session.belongs_to("J1"));
        assert!(!session.belongs_to("J2"));
    }
}
