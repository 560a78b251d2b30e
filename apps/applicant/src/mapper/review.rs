//! Server review snapshot → review view.

use crate::mapper::prefill::from_wire;
use crate::models::application::ApplicationData;
use crate::models::review::{ReviewSnapshot, ReviewView};

/// Maps the server's denormalized snapshot into UI shape.
///
/// Each section is decoded with the prefill rules onto blank form state, so
/// names, dates and graduation years normalize exactly as they do for prefill.
pub fn review_view(snapshot: &ReviewSnapshot) -> ReviewView {
    let mut data = ApplicationData::default();
    for section in [
        &snapshot.personal_information,
        &snapshot.experience_and_skills,
        &snapshot.application_preferences,
    ] {
        from_wire(section).apply_to(&mut data);
    }

    ReviewView {
        personal_info: data.personal_info,
        address_info: data.address_info,
        experience: data.experience,
        questions: data.questions,
        documents: snapshot.attached_documents.clone(),
        position: snapshot.position.clone(),
    }
}
