//! In-memory, UI-shaped application data.
//!
//! Owned by the wizard while an application is in progress; renderers only
//! read it and write back through the wizard's edit handler.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::mapper::normalize::{graduation_year_from_value, normalize_end_date, normalize_month};

pub const DEFAULT_COUNTRY: &str = "US";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub linked_in: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressInfo {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for AddressInfo {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

/// A single position in the candidate's work history.
///
/// `end_date` and `is_current` are private: a current position never carries
/// an end date, and the setters keep it that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WorkExperienceFields")]
pub struct WorkExperience {
    pub company: String,
    pub job_title: String,
    /// `YYYY-MM`, or empty.
    pub start_date: String,
    end_date: String,
    is_current: bool,
    pub location: String,
    /// Newline-delimited, one responsibility per line.
    pub responsibilities: String,
}

impl WorkExperience {
    pub fn new(company: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            job_title: job_title.into(),
            ..Self::default()
        }
    }

    pub fn end_date(&self) -> &str {
        &self.end_date
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    /// Marks the position as current (clearing the end date) or not.
    pub fn set_current(&mut self, is_current: bool) {
        self.is_current = is_current;
        if is_current {
            self.end_date.clear();
        }
    }

    /// Sets the start date, normalized to `YYYY-MM`.
    pub fn set_start_date(&mut self, start_date: &str) {
        self.start_date = normalize_month(start_date);
    }

    /// Sets the end date, normalized to `YYYY-MM`. `present` marks the position
    /// current; any other non-empty end date means the position is over.
    pub fn set_end_date(&mut self, end_date: impl Into<String>) {
        let (end_date, ends_present) = normalize_end_date(&end_date.into());
        if ends_present {
            self.set_current(true);
            return;
        }
        self.end_date = end_date;
        if !self.end_date.is_empty() {
            self.is_current = false;
        }
    }

    pub fn with_dates(
        mut self,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        self.set_start_date(&start_date.into());
        self.set_end_date(end_date);
        self
    }

    pub fn currently_held(mut self) -> Self {
        self.set_current(true);
        self
    }
}

/// Unchecked deserialization shape for [`WorkExperience`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct WorkExperienceFields {
    company: String,
    job_title: String,
    start_date: String,
    end_date: String,
    is_current: bool,
    location: String,
    responsibilities: String,
}

impl From<WorkExperienceFields> for WorkExperience {
    fn from(fields: WorkExperienceFields) -> Self {
        let mut entry = WorkExperience {
            company: fields.company,
            job_title: fields.job_title,
            start_date: normalize_month(&fields.start_date),
            end_date: String::new(),
            is_current: false,
            location: fields.location,
            responsibilities: fields.responsibilities,
        };
        entry.set_end_date(fields.end_date);
        if fields.is_current {
            entry.set_current(true);
        }
        entry
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    /// 0 = unset.
    #[serde(deserialize_with = "deserialize_graduation_year")]
    pub graduation_year: i32,
    pub gpa: String,
}

/// Accepts a number, a numeric string, blank or null; anything unusable is 0.
fn deserialize_graduation_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(graduation_year_from_value(value.as_ref()))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    pub summary: String,
    pub technical_skills: String,
    pub soft_skills: String,
    pub work_experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
}

impl Experience {
    pub fn add_work_experience(&mut self, entry: WorkExperience) -> usize {
        self.work_experience.push(entry);
        self.work_experience.len() - 1
    }

    pub fn remove_work_experience(&mut self, index: usize) -> Option<WorkExperience> {
        (index < self.work_experience.len()).then(|| self.work_experience.remove(index))
    }

    pub fn add_education(&mut self, entry: Education) -> usize {
        self.education.push(entry);
        self.education.len() - 1
    }

    pub fn remove_education(&mut self, index: usize) -> Option<Education> {
        (index < self.education.len()).then(|| self.education.remove(index))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Questions {
    pub work_authorization: String,
    pub visa_sponsorship: String,
    pub relocate: String,
    pub remote_work: String,
    pub preferred_location: String,
    pub availability: String,
    pub salary_min: String,
    pub salary_max: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Disclosures {
    pub government_employment: String,
    pub non_compete: String,
    pub previous_employment: String,
    pub previous_alias: String,
    pub personnel_number: String,
}

/// Self-identified race categories. Keeps first-insertion order for the wire
/// but compares as a set and never holds the same code twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RaceCategories(Vec<String>);

impl RaceCategories {
    pub fn insert(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.0.push(code);
        true
    }

    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|c| c != code);
        self.0.len() != before
    }

    /// Checkbox semantics: returns whether the code is selected afterwards.
    pub fn toggle(&mut self, code: &str) -> bool {
        if self.remove(code) {
            false
        } else {
            self.insert(code)
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl PartialEq for RaceCategories {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().all(|code| other.contains(code))
    }
}

impl<S: Into<String>> FromIterator<S> for RaceCategories {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut categories = RaceCategories::default();
        for code in iter {
            categories.insert(code);
        }
        categories
    }
}

impl From<Vec<String>> for RaceCategories {
    fn from(codes: Vec<String>) -> Self {
        codes.into_iter().collect()
    }
}

impl From<RaceCategories> for Vec<String> {
    fn from(categories: RaceCategories) -> Self {
        categories.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub gender: String,
    pub race: RaceCategories,
    pub veteran_status: String,
    pub disability: String,
}

/// Client-side aggregate for one in-progress application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationData {
    pub personal_info: PersonalInfo,
    pub address_info: AddressInfo,
    pub experience: Experience,
    pub questions: Questions,
    pub disclosures: Disclosures,
    pub identity: Identity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_current_clears_end_date() {
        let mut entry =
            WorkExperience::new("Analytical Engines", "Engineer").with_dates("2019-01", "2021-06");
        assert_eq!(entry.end_date(), "2021-06");

        entry.set_current(true);
        assert!(entry.is_current());
        assert_eq!(entry.end_date(), "");
    }

    #[test]
    fn test_set_end_date_ends_current_position() {
        let mut entry = WorkExperience::new("Acme", "Dev").currently_held();
        entry.set_end_date("2024-02");
        assert!(!entry.is_current());
        assert_eq!(entry.end_date(), "2024-02");
    }

    #[test]
    fn test_unsetting_current_keeps_empty_end_date() {
        let mut entry = WorkExperience::new("Acme", "Dev").currently_held();
        entry.set_current(false);
        assert!(!entry.is_current());
        assert_eq!(entry.end_date(), "");
    }

    #[test]
    fn test_set_end_date_normalizes_input() {
        let mut entry = WorkExperience::new("Acme", "Dev");
        entry.set_end_date("Present");
        assert!(entry.is_current());
        assert_eq!(entry.end_date(), "");

        entry.set_end_date("03/2020");
        assert!(!entry.is_current());
        assert_eq!(entry.end_date(), "2020-03");

        entry.set_end_date("someday");
        assert_eq!(entry.end_date(), "");
    }

    #[test]
    fn test_with_dates_normalizes_start_date() {
        let entry = WorkExperience::new("Acme", "Dev").with_dates("2019", "present");
        assert_eq!(entry.start_date, "2019-01");
        assert!(entry.is_current());
    }

    #[test]
    fn test_deserialized_work_experience_is_normalized() {
        let entry: WorkExperience = serde_json::from_str(
            r#"{"company": "Acme", "startDate": "03/2020", "endDate": "present"}"#,
        )
        .unwrap();
        assert_eq!(entry.start_date, "2020-03");
        assert_eq!(entry.end_date(), "");
        assert!(entry.is_current());
    }

    #[test]
    fn test_graduation_year_accepts_strings() {
        let parse = |raw: &str| serde_json::from_str::<Education>(raw).unwrap().graduation_year;
        assert_eq!(parse(r#"{"graduationYear": "2018"}"#), 2018);
        assert_eq!(parse(r#"{"graduationYear": ""}"#), 0);
        assert_eq!(parse(r#"{"graduationYear": "abc"}"#), 0);
        assert_eq!(parse(r#"{"graduationYear": null}"#), 0);
        assert_eq!(parse(r#"{"graduationYear": 1999}"#), 1999);
        assert_eq!(parse(r#"{}"#), 0);
    }

    #[test]
    fn test_deserialize_enforces_current_invariant() {
        let json = r#"{"company":"Acme","endDate":"2020-01","isCurrent":true}"#;
        let entry: WorkExperience = serde_json::from_str(json).unwrap();
        assert!(entry.is_current());
        assert_eq!(entry.end_date(), "");
    }

    #[test]
    fn test_address_defaults_to_us() {
        assert_eq!(AddressInfo::default().country, "US");
        let data: ApplicationData = serde_json::from_str("{}").unwrap();
        assert_eq!(data.address_info.country, "US");
    }

    #[test]
    fn test_race_categories_have_no_duplicates() {
        let mut race = RaceCategories::default();
        assert!(race.insert("asian"));
        assert!(!race.insert("asian"));
        assert!(race.insert("white"));
        assert_eq!(race.as_slice(), ["asian", "white"]);
    }

    #[test]
    fn test_race_categories_equality_ignores_order() {
        let a: RaceCategories = ["asian", "white"].into_iter().collect();
        let b: RaceCategories = ["white", "asian"].into_iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_race_toggle() {
        let mut race = RaceCategories::default();
        assert!(race.toggle("black"));
        assert!(!race.toggle("black"));
        assert!(race.is_empty());
    }

    #[test]
    fn test_remove_out_of_range_entry_is_none() {
        let mut experience = Experience::default();
        experience.add_education(Education::default());
        assert!(experience.remove_education(3).is_none());
        assert!(experience.remove_education(0).is_some());
        assert!(experience.remove_work_experience(0).is_none());
    }
}
