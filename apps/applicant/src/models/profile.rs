use serde::{Deserialize, Serialize};

/// The signed-in user's profile as returned by `GET /users/profile`.
///
/// Only the parts the wizard reads are modelled; everything else is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub applications: Vec<ApplicationRecord>,
}

impl UserProfile {
    pub fn application_for(&self, job_id: &str) -> Option<&ApplicationRecord> {
        self.applications.iter().find(|record| record.job_id == job_id)
    }
}

/// One application as seen from the user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationRecord {
    #[serde(alias = "job_id")]
    pub job_id: String,
    pub qualified: bool,
    pub status: String,
}

/// Progress as reported by `GET /applications/{id}/status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    #[serde(default)]
    pub status: String,
    #[serde(alias = "current_step")]
    pub current_step: u8,
    #[serde(alias = "total_steps", default = "default_total_steps")]
    pub total_steps: u8,
}

fn default_total_steps() -> u8 {
    6
}
