//! Wire shapes for each saveable step and the UI → wire transform.

use serde::{Deserialize, Serialize};

use crate::mapper::normalize::{normalize_month, responsibilities_to_lines};
use crate::models::application::{
    AddressInfo, ApplicationData, Disclosures, Education, Experience, Identity, PersonalInfo,
    Questions, WorkExperience,
};
use crate::models::step::Step;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressWire {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoWire {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linkedin_url: String,
    pub address: AddressWire,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperienceWire {
    pub company: String,
    pub job_title: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    pub location: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationWire {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    /// Omitted when unset (0) in form state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    pub gpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceWire {
    pub summary: String,
    pub technical_skills: String,
    pub soft_skills: String,
    pub work_experience: Vec<WorkExperienceWire>,
    pub education: Vec<EducationWire>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionsWire {
    pub work_authorization: String,
    pub visa_sponsorship: String,
    pub willing_to_relocate: String,
    pub remote_work: String,
    pub preferred_location: String,
    pub availability: String,
    pub salary_min: String,
    pub salary_max: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisclosuresWire {
    pub government_employment: String,
    pub non_compete: String,
    pub previous_employment: String,
    pub previous_alias: String,
    pub personnel_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityWire {
    pub gender: String,
    pub race: Vec<String>,
    pub veteran_status: String,
    pub disability: String,
}

/// The `step_data` body of a step save, one variant per saveable step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StepPayload {
    PersonalInfo(PersonalInfoWire),
    Experience(ExperienceWire),
    Questions(QuestionsWire),
    Disclosures(DisclosuresWire),
    Identity(IdentityWire),
}

impl StepPayload {
    pub fn step(&self) -> Step {
        match self {
            StepPayload::PersonalInfo(_) => Step::PersonalInfo,
            StepPayload::Experience(_) => Step::Experience,
            StepPayload::Questions(_) => Step::Questions,
            StepPayload::Disclosures(_) => Step::Disclosures,
            StepPayload::Identity(_) => Step::Identity,
        }
    }
}

/// Maps the form state for `step` to its wire payload.
///
/// The review step has nothing to save and yields `None`.
pub fn to_wire(step: Step, data: &ApplicationData) -> Option<StepPayload> {
    let payload = match step {
        Step::PersonalInfo => {
            StepPayload::PersonalInfo(personal_to_wire(&data.personal_info, &data.address_info))
        }
        Step::Experience => StepPayload::Experience(experience_to_wire(&data.experience)),
        Step::Questions => StepPayload::Questions(questions_to_wire(&data.questions)),
        Step::Disclosures => StepPayload::Disclosures(disclosures_to_wire(&data.disclosures)),
        Step::Identity => StepPayload::Identity(identity_to_wire(&data.identity)),
        Step::Review => return None,
    };
    Some(payload)
}

fn personal_to_wire(personal: &PersonalInfo, address: &AddressInfo) -> PersonalInfoWire {
    PersonalInfoWire {
        first_name: personal.first_name.trim().to_string(),
        last_name: personal.last_name.trim().to_string(),
        email: personal.email.trim().to_string(),
        phone: personal.phone.trim().to_string(),
        linkedin_url: personal.linked_in.trim().to_string(),
        address: AddressWire {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
        },
    }
}

fn experience_to_wire(experience: &Experience) -> ExperienceWire {
    ExperienceWire {
        summary: experience.summary.clone(),
        technical_skills: experience.technical_skills.clone(),
        soft_skills: experience.soft_skills.clone(),
        work_experience: experience.work_experience.iter().map(work_to_wire).collect(),
        education: experience.education.iter().map(education_to_wire).collect(),
    }
}

fn work_to_wire(entry: &WorkExperience) -> WorkExperienceWire {
    WorkExperienceWire {
        company: entry.company.clone(),
        job_title: entry.job_title.clone(),
        start_date: normalize_month(&entry.start_date),
        end_date: entry.end_date().to_string(),
        is_current: entry.is_current(),
        location: entry.location.clone(),
        responsibilities: responsibilities_to_lines(&entry.responsibilities),
    }
}

fn education_to_wire(entry: &Education) -> EducationWire {
    EducationWire {
        institution: entry.institution.clone(),
        degree: entry.degree.clone(),
        field_of_study: entry.field_of_study.clone(),
        graduation_year: (entry.graduation_year > 0).then_some(entry.graduation_year),
        gpa: entry.gpa.clone(),
    }
}

fn questions_to_wire(questions: &Questions) -> QuestionsWire {
    QuestionsWire {
        work_authorization: questions.work_authorization.clone(),
        visa_sponsorship: questions.visa_sponsorship.clone(),
        willing_to_relocate: questions.relocate.clone(),
        remote_work: questions.remote_work.clone(),
        preferred_location: questions.preferred_location.clone(),
        availability: questions.availability.clone(),
        salary_min: questions.salary_min.clone(),
        salary_max: questions.salary_max.clone(),
    }
}

fn disclosures_to_wire(disclosures: &Disclosures) -> DisclosuresWire {
    DisclosuresWire {
        government_employment: disclosures.government_employment.clone(),
        non_compete: disclosures.non_compete.clone(),
        previous_employment: disclosures.previous_employment.clone(),
        previous_alias: disclosures.previous_alias.clone(),
        personnel_number: disclosures.personnel_number.clone(),
    }
}

fn identity_to_wire(identity: &Identity) -> IdentityWire {
    IdentityWire {
        gender: identity.gender.clone(),
        race: identity.race.as_slice().to_vec(),
        veteran_status: identity.veteran_status.clone(),
        disability: identity.disability.clone(),
    }
}
