//! Wire → UI mapping for server prefill payloads.
//!
//! Prefill arrives loosely shaped (flat, or nested by section) and only ever
//! fills fields the candidate has not already filled in.

use serde_json::{Map, Value};

use crate::mapper::normalize::{
    graduation_year_from_value, lines_to_responsibilities, normalize_end_date, normalize_month,
    split_full_name, value_as_lines, value_as_text,
};
use crate::models::application::{
    ApplicationData, Education, RaceCategories, WorkExperience, DEFAULT_COUNTRY,
};

/// Nested objects searched after the top level, in order.
const NESTED_SECTIONS: &[&str] = &[
    "personal_information",
    "address",
    "experience_and_skills",
    "application_preferences",
    "disclosures",
    "identity",
];

/// Every free-text field of [`ApplicationData`] that prefill may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    FirstName,
    LastName,
    Email,
    Phone,
    LinkedIn,
    Street,
    City,
    State,
    ZipCode,
    Country,
    Summary,
    TechnicalSkills,
    SoftSkills,
    WorkAuthorization,
    VisaSponsorship,
    Relocate,
    RemoteWork,
    PreferredLocation,
    Availability,
    SalaryMin,
    SalaryMax,
    GovernmentEmployment,
    NonCompete,
    PreviousEmployment,
    PreviousAlias,
    PersonnelNumber,
    Gender,
    VeteranStatus,
    Disability,
}

impl TextField {
    pub const ALL: [TextField; 29] = [
        TextField::FirstName,
        TextField::LastName,
        TextField::Email,
        TextField::Phone,
        TextField::LinkedIn,
        TextField::Street,
        TextField::City,
        TextField::State,
        TextField::ZipCode,
        TextField::Country,
        TextField::Summary,
        TextField::TechnicalSkills,
        TextField::SoftSkills,
        TextField::WorkAuthorization,
        TextField::VisaSponsorship,
        TextField::Relocate,
        TextField::RemoteWork,
        TextField::PreferredLocation,
        TextField::Availability,
        TextField::SalaryMin,
        TextField::SalaryMax,
        TextField::GovernmentEmployment,
        TextField::NonCompete,
        TextField::PreviousEmployment,
        TextField::PreviousAlias,
        TextField::PersonnelNumber,
        TextField::Gender,
        TextField::VeteranStatus,
        TextField::Disability,
    ];

    /// Accepted wire keys, preferred first.
    fn wire_keys(self) -> &'static [&'static str] {
        match self {
            TextField::FirstName => &["first_name", "firstName"],
            TextField::LastName => &["last_name", "lastName"],
            TextField::Email => &["email"],
            TextField::Phone => &["phone", "phone_number"],
            TextField::LinkedIn => &["linkedin_url", "linkedin", "linkedIn"],
            TextField::Street => &["street", "street_address"],
            TextField::City => &["city"],
            TextField::State => &["state", "region"],
            TextField::ZipCode => &["zip_code", "zipCode", "postal_code"],
            TextField::Country => &["country"],
            TextField::Summary => &["summary", "professional_summary"],
            TextField::TechnicalSkills => &["technical_skills", "technicalSkills"],
            TextField::SoftSkills => &["soft_skills", "softSkills"],
            TextField::WorkAuthorization => &["work_authorization"],
            TextField::VisaSponsorship => &["visa_sponsorship"],
            TextField::Relocate => &["willing_to_relocate", "relocate"],
            TextField::RemoteWork => &["remote_work"],
            TextField::PreferredLocation => &["preferred_location"],
            TextField::Availability => &["availability"],
            TextField::SalaryMin => &["salary_min"],
            TextField::SalaryMax => &["salary_max"],
            TextField::GovernmentEmployment => &["government_employment"],
            TextField::NonCompete => &["non_compete"],
            TextField::PreviousEmployment => &["previous_employment"],
            TextField::PreviousAlias => &["previous_alias"],
            TextField::PersonnelNumber => &["personnel_number"],
            TextField::Gender => &["gender"],
            TextField::VeteranStatus => &["veteran_status"],
            TextField::Disability => &["disability"],
        }
    }

    pub fn slot(self, data: &mut ApplicationData) -> &mut String {
        match self {
            TextField::FirstName => &mut data.personal_info.first_name,
            TextField::LastName => &mut data.personal_info.last_name,
            TextField::Email => &mut data.personal_info.email,
            TextField::Phone => &mut data.personal_info.phone,
            TextField::LinkedIn => &mut data.personal_info.linked_in,
            TextField::Street => &mut data.address_info.street,
            TextField::City => &mut data.address_info.city,
            TextField::State => &mut data.address_info.state,
            TextField::ZipCode => &mut data.address_info.zip_code,
            TextField::Country => &mut data.address_info.country,
            TextField::Summary => &mut data.experience.summary,
            TextField::TechnicalSkills => &mut data.experience.technical_skills,
            TextField::SoftSkills => &mut data.experience.soft_skills,
            TextField::WorkAuthorization => &mut data.questions.work_authorization,
            TextField::VisaSponsorship => &mut data.questions.visa_sponsorship,
            TextField::Relocate => &mut data.questions.relocate,
            TextField::RemoteWork => &mut data.questions.remote_work,
            TextField::PreferredLocation => &mut data.questions.preferred_location,
            TextField::Availability => &mut data.questions.availability,
            TextField::SalaryMin => &mut data.questions.salary_min,
            TextField::SalaryMax => &mut data.questions.salary_max,
            TextField::GovernmentEmployment => &mut data.disclosures.government_employment,
            TextField::NonCompete => &mut data.disclosures.non_compete,
            TextField::PreviousEmployment => &mut data.disclosures.previous_employment,
            TextField::PreviousAlias => &mut data.disclosures.previous_alias,
            TextField::PersonnelNumber => &mut data.disclosures.personnel_number,
            TextField::Gender => &mut data.identity.gender,
            TextField::VeteranStatus => &mut data.identity.veteran_status,
            TextField::Disability => &mut data.identity.disability,
        }
    }

    /// Whether the current value is still a placeholder that prefill may replace.
    fn is_unfilled(self, current: &str) -> bool {
        current.trim().is_empty() || (self == TextField::Country && current == DEFAULT_COUNTRY)
    }
}

/// A partial [`ApplicationData`] decoded from a server payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPatch {
    pub text: Vec<(TextField, String)>,
    pub work_experience: Option<Vec<WorkExperience>>,
    pub education: Option<Vec<Education>>,
    pub race: Option<RaceCategories>,
}

impl ApplicationPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
            && self.work_experience.is_none()
            && self.education.is_none()
            && self.race.is_none()
    }

    pub fn get(&self, field: TextField) -> Option<&str> {
        self.text
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, value)| value.as_str())
    }

    /// Fills unfilled fields of `data`, leaving anything the candidate entered untouched.
    /// Returns the number of fields that changed.
    pub fn apply_to(&self, data: &mut ApplicationData) -> usize {
        let mut applied = 0;

        for (field, value) in &self.text {
            let slot = field.slot(data);
            if field.is_unfilled(slot.as_str()) && slot.as_str() != value.as_str() {
                *slot = value.clone();
                applied += 1;
            }
        }

        if let Some(entries) = &self.work_experience {
            if data.experience.work_experience.is_empty() && !entries.is_empty() {
                data.experience.work_experience = entries.clone();
                applied += 1;
            }
        }
        if let Some(entries) = &self.education {
            if data.experience.education.is_empty() && !entries.is_empty() {
                data.experience.education = entries.clone();
                applied += 1;
            }
        }
        if let Some(race) = &self.race {
            if data.identity.race.is_empty() && !race.is_empty() {
                data.identity.race = race.clone();
                applied += 1;
            }
        }

        applied
    }
}

/// Decodes a prefill (or review section) payload into a patch.
///
/// Non-object payloads decode to an empty patch.
pub fn from_wire(payload: &Value) -> ApplicationPatch {
    let Some(root) = payload.as_object() else {
        return ApplicationPatch::default();
    };
    let sources = sources(root);
    let mut patch = ApplicationPatch::default();

    for field in TextField::ALL {
        if let Some(text) = lookup(&sources, field.wire_keys()).and_then(value_as_text) {
            if !text.trim().is_empty() {
                patch.text.push((field, text.trim().to_string()));
            }
        }
    }

    if patch.get(TextField::FirstName).is_none() {
        if let Some(full_name) = lookup(&sources, &["full_name", "name"]).and_then(Value::as_str) {
            let (first, last) = split_full_name(full_name);
            if !first.is_empty() {
                patch.text.push((TextField::FirstName, first));
            }
            if !last.is_empty() && patch.get(TextField::LastName).is_none() {
                patch.text.push((TextField::LastName, last));
            }
        }
    }

    patch.work_experience = lookup(&sources, &["work_experience", "workExperience"])
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(work_from_value).collect());
    patch.education = lookup(&sources, &["education"])
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(education_from_value).collect());
    patch.race = lookup(&sources, &["race"])
        .map(|value| value_as_lines(value).into_iter().collect::<RaceCategories>());

    patch
}

fn sources(root: &Map<String, Value>) -> Vec<&Map<String, Value>> {
    let mut sources = vec![root];
    for key in NESTED_SECTIONS {
        if let Some(nested) = root.get(*key).and_then(Value::as_object) {
            sources.push(nested);
            if let Some(address) = nested.get("address").and_then(Value::as_object) {
                sources.push(address);
            }
        }
    }
    sources
}

fn lookup<'a>(sources: &[&'a Map<String, Value>], keys: &[&str]) -> Option<&'a Value> {
    sources.iter().find_map(|source| {
        keys.iter()
            .filter_map(|key| source.get(*key))
            .find(|value| !value.is_null())
    })
}

fn text(entry: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| entry.get(*key))
        .find_map(value_as_text)
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn work_from_value(value: &Value) -> Option<WorkExperience> {
    let entry = value.as_object()?;
    let (end_date, ends_present) = normalize_end_date(&text(entry, &["end_date", "endDate"]));
    let flagged_current = entry
        .get("is_current")
        .or_else(|| entry.get("isCurrent"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let responsibilities = entry
        .get("responsibilities")
        .map(value_as_lines)
        .unwrap_or_default();

    let mut work = WorkExperience::new(
        text(entry, &["company", "employer"]),
        text(entry, &["job_title", "jobTitle", "title", "position"]),
    );
    work.start_date = normalize_month(&text(entry, &["start_date", "startDate"]));
    work.location = text(entry, &["location"]);
    work.responsibilities = lines_to_responsibilities(&responsibilities);
    work.set_end_date(end_date);
    if ends_present || flagged_current {
        work.set_current(true);
    }
    Some(work)
}

fn education_from_value(value: &Value) -> Option<Education> {
    let entry = value.as_object()?;
    Some(Education {
        institution: text(entry, &["institution", "school"]),
        degree: text(entry, &["degree"]),
        field_of_study: text(entry, &["field_of_study", "fieldOfStudy", "major"]),
        graduation_year: graduation_year_from_value(
            entry
                .get("graduation_year")
                .or_else(|| entry.get("graduationYear")),
        ),
        gpa: text(entry, &["gpa"]),
    })
}
