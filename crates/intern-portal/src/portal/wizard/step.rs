use serde::Serialize;

use crate::portal::validation::ApplicationField;

/// Wizard pages in the order they are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    PersonalInfo,
    Education,
    Skills,
    Resume,
    Review,
}

const PERSONAL_FIELDS: [ApplicationField; 9] = [
    ApplicationField::FirstName,
    ApplicationField::LastName,
    ApplicationField::Email,
    ApplicationField::Phone,
    ApplicationField::DateOfBirth,
    ApplicationField::Address,
    ApplicationField::City,
    ApplicationField::State,
    ApplicationField::ZipCode,
];

// Skills lives on the education page even though it is part of the experience record.
const EDUCATION_FIELDS: [ApplicationField; 5] = [
    ApplicationField::Degree,
    ApplicationField::FieldOfStudy,
    ApplicationField::University,
    ApplicationField::GraduationYear,
    ApplicationField::Skills,
];

const DETAIL_FIELDS: [ApplicationField; 3] = [
    ApplicationField::CoverLetter,
    ApplicationField::WhyInterested,
    ApplicationField::Availability,
];

const REVIEW_FIELDS: [ApplicationField; 1] = [ApplicationField::TermsAccepted];

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::PersonalInfo,
        WizardStep::Education,
        WizardStep::Skills,
        WizardStep::Resume,
        WizardStep::Review,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub const fn index(self) -> usize {
        match self {
            WizardStep::PersonalInfo => 0,
            WizardStep::Education => 1,
            WizardStep::Skills => 2,
            WizardStep::Resume => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(self) -> &'static str {
        match self {
            WizardStep::PersonalInfo => "Personal Info",
            WizardStep::Education => "Education",
            WizardStep::Skills => "Skills",
            WizardStep::Resume => "Resume Link",
            WizardStep::Review => "Submit",
        }
    }

    /// Fields checked when leaving this step. The resume step has none; it is gated by the
    /// resume choice instead.
    pub const fn fields(self) -> &'static [ApplicationField] {
        match self {
            WizardStep::PersonalInfo => &PERSONAL_FIELDS,
            WizardStep::Education => &EDUCATION_FIELDS,
            WizardStep::Skills => &DETAIL_FIELDS,
            WizardStep::Resume => &[],
            WizardStep::Review => &REVIEW_FIELDS,
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, WizardStep::Review)
    }
}
