use std::fmt;

use serde::{Deserialize, Serialize};

/// The six stages of the application wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Step {
    PersonalInfo = 1,
    Experience = 2,
    Questions = 3,
    Disclosures = 4,
    Identity = 5,
    Review = 6,
}

impl Step {
    pub const FIRST: Step = Step::PersonalInfo;
    pub const ALL: [Step; 6] = [
        Step::PersonalInfo,
        Step::Experience,
        Step::Questions,
        Step::Disclosures,
        Step::Identity,
        Step::Review,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Step> {
        Self::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    /// Clamps an arbitrary server- or storage-provided step number into range.
    pub fn clamped(number: u8) -> Step {
        Self::from_number(number.clamp(1, 6)).unwrap_or(Step::FIRST)
    }

    pub fn next(self) -> Option<Step> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        Self::from_number(self.number() - 1)
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::PersonalInfo => "Personal information",
            Step::Experience => "Experience & skills",
            Step::Questions => "Application questions",
            Step::Disclosures => "Disclosures",
            Step::Identity => "Voluntary self-identification",
            Step::Review => "Review & submit",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.title())
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = String;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Step::from_number(number).ok_or_else(|| format!("step {number} is outside 1..=6"))
    }
}
