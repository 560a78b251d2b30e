use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::application::{AddressInfo, ApplicationData, Experience, PersonalInfo, Questions};

/// Server-side denormalized view of an application, from `GET /applications/{id}/review`.
///
/// Sections are kept loosely typed; the mapper reads them with the same
/// field rules it applies to prefill payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSnapshot {
    pub personal_information: Value,
    pub experience_and_skills: Value,
    pub application_preferences: Value,
    pub attached_documents: Vec<AttachedDocument>,
    pub position: Option<PositionSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachedDocument {
    pub name: String,
    #[serde(alias = "type", alias = "document_type")]
    pub kind: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionSummary {
    #[serde(alias = "jobId")]
    pub job_id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// Review content mapped into UI shape from a server snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewView {
    pub personal_info: PersonalInfo,
    pub address_info: AddressInfo,
    pub experience: Experience,
    pub questions: Questions,
    pub documents: Vec<AttachedDocument>,
    pub position: Option<PositionSummary>,
}

/// What the review step shows: the server's snapshot when it could be fetched,
/// otherwise the locally held form data.
#[derive(Debug, Clone, PartialEq)]
pub enum Displayed {
    ServerSnapshot(ReviewView),
    LocalFallback(ApplicationData),
}

impl Displayed {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Displayed::LocalFallback(_))
    }
}
