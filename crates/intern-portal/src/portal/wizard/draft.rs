use crate::portal::domain::{
    ApplicationSubmission, Attachment, EducationDetails, ExperienceDetails, ResumeReference,
};
use crate::portal::validation::{
    application_rule, is_well_formed_url, ApplicationField, FieldErrors, FieldValue,
};

/// Typed, in-progress application. Optional text fields are empty strings until filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub degree: String,
    pub field_of_study: String,
    pub university: String,
    pub graduation_year: String,
    pub gpa: String,
    pub has_experience: bool,
    pub previous_internships: String,
    pub projects: String,
    pub skills: String,
    pub cover_letter: String,
    pub why_interested: String,
    pub availability: String,
    pub terms_accepted: bool,
    pub internship_id: String,
}

impl ApplicationDraft {
    pub fn for_internship(internship_id: impl Into<String>) -> Self {
        Self {
            internship_id: internship_id.into(),
            ..Self::default()
        }
    }

    pub fn value(&self, field: ApplicationField) -> FieldValue<'_> {
        match field {
            ApplicationField::HasExperience => FieldValue::Flag(self.has_experience),
            ApplicationField::TermsAccepted => FieldValue::Flag(self.terms_accepted),
            text => FieldValue::Text(self.text(text).unwrap_or_default()),
        }
    }

    fn text(&self, field: ApplicationField) -> Option<&str> {
        let value = match field {
            ApplicationField::FirstName => &self.first_name,
            ApplicationField::LastName => &self.last_name,
            ApplicationField::Email => &self.email,
            ApplicationField::Phone => &self.phone,
            ApplicationField::DateOfBirth => &self.date_of_birth,
            ApplicationField::Address => &self.address,
            ApplicationField::City => &self.city,
            ApplicationField::State => &self.state,
            ApplicationField::ZipCode => &self.zip_code,
            ApplicationField::Degree => &self.degree,
            ApplicationField::FieldOfStudy => &self.field_of_study,
            ApplicationField::University => &self.university,
            ApplicationField::GraduationYear => &self.graduation_year,
            ApplicationField::Gpa => &self.gpa,
            ApplicationField::PreviousInternships => &self.previous_internships,
            ApplicationField::Projects => &self.projects,
            ApplicationField::Skills => &self.skills,
            ApplicationField::CoverLetter => &self.cover_letter,
            ApplicationField::WhyInterested => &self.why_interested,
            ApplicationField::Availability => &self.availability,
            ApplicationField::HasExperience | ApplicationField::TermsAccepted => return None,
        };
        Some(value.as_str())
    }

    /// Mutable handle to a text field; `None` for the checkbox fields.
    pub fn text_mut(&mut self, field: ApplicationField) -> Option<&mut String> {
        let value = match field {
            ApplicationField::FirstName => &mut self.first_name,
            ApplicationField::LastName => &mut self.last_name,
            ApplicationField::Email => &mut self.email,
            ApplicationField::Phone => &mut self.phone,
            ApplicationField::DateOfBirth => &mut self.date_of_birth,
            ApplicationField::Address => &mut self.address,
            ApplicationField::City => &mut self.city,
            ApplicationField::State => &mut self.state,
            ApplicationField::ZipCode => &mut self.zip_code,
            ApplicationField::Degree => &mut self.degree,
            ApplicationField::FieldOfStudy => &mut self.field_of_study,
            ApplicationField::University => &mut self.university,
            ApplicationField::GraduationYear => &mut self.graduation_year,
            ApplicationField::Gpa => &mut self.gpa,
            ApplicationField::PreviousInternships => &mut self.previous_internships,
            ApplicationField::Projects => &mut self.projects,
            ApplicationField::Skills => &mut self.skills,
            ApplicationField::CoverLetter => &mut self.cover_letter,
            ApplicationField::WhyInterested => &mut self.why_interested,
            ApplicationField::Availability => &mut self.availability,
            ApplicationField::HasExperience | ApplicationField::TermsAccepted => return None,
        };
        Some(value)
    }

    /// Outcome of the field's rule against its current value.
    pub fn check(&self, field: ApplicationField) -> Option<&'static str> {
        application_rule(field).and_then(|rule| rule.check(self.value(field)))
    }

    pub fn validate(&self, fields: &[ApplicationField]) -> FieldErrors<ApplicationField> {
        let mut errors = FieldErrors::new();
        for &field in fields {
            errors.apply(field, self.check(field));
        }
        errors
    }

    pub fn validate_all(&self) -> FieldErrors<ApplicationField> {
        self.validate(&ApplicationField::ALL)
    }

    pub fn to_submission(
        &self,
        resume: ResumeReference,
        portfolio: Option<Attachment>,
    ) -> ApplicationSubmission {
        ApplicationSubmission {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            date_of_birth: self.date_of_birth.clone(),
            address: self.address.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
            education: EducationDetails {
                degree: self.degree.clone(),
                field: self.field_of_study.clone(),
                university: self.university.clone(),
                graduation_year: self.graduation_year.clone(),
                gpa: optional(&self.gpa),
            },
            experience: ExperienceDetails {
                has_experience: self.has_experience,
                previous_internships: optional(&self.previous_internships),
                projects: optional(&self.projects),
                skills: self.skills.clone(),
            },
            cover_letter: self.cover_letter.clone(),
            why_interested: self.why_interested.clone(),
            availability: self.availability.clone(),
            resume,
            portfolio,
            terms_accepted: self.terms_accepted,
            internship_id: self.internship_id.clone(),
        }
    }

    /// Rebuild a draft from a received payload so it can be checked with the same rules.
    pub fn from_submission(submission: &ApplicationSubmission) -> Self {
        let education = &submission.education;
        let experience = &submission.experience;
        Self {
            first_name: submission.first_name.clone(),
            last_name: submission.last_name.clone(),
            email: submission.email.clone(),
            phone: submission.phone.clone(),
            date_of_birth: submission.date_of_birth.clone(),
            address: submission.address.clone(),
            city: submission.city.clone(),
            state: submission.state.clone(),
            zip_code: submission.zip_code.clone(),
            degree: education.degree.clone(),
            field_of_study: education.field.clone(),
            university: education.university.clone(),
            graduation_year: education.graduation_year.clone(),
            gpa: education.gpa.clone().unwrap_or_default(),
            has_experience: experience.has_experience,
            previous_internships: experience.previous_internships.clone().unwrap_or_default(),
            projects: experience.projects.clone().unwrap_or_default(),
            skills: experience.skills.clone(),
            cover_letter: submission.cover_letter.clone(),
            why_interested: submission.why_interested.clone(),
            availability: submission.availability.clone(),
            terms_accepted: submission.terms_accepted,
            internship_id: submission.internship_id.clone(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Resume attached to the draft. A file and a link are never held together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResumeChoice {
    #[default]
    Missing,
    File(Attachment),
    Link(String),
}

impl ResumeChoice {
    pub fn is_provided(&self) -> bool {
        match self {
            ResumeChoice::Missing => false,
            ResumeChoice::File(_) => true,
            ResumeChoice::Link(url) => is_well_formed_url(url),
        }
    }

    pub fn file(&self) -> Option<&Attachment> {
        match self {
            ResumeChoice::File(file) => Some(file),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            ResumeChoice::Link(url) => Some(url),
            _ => None,
        }
    }

    /// Apply an edit of the link input. A blank edit keeps an uploaded file.
    pub fn with_link(self, value: &str) -> Self {
        if !value.is_empty() {
            return ResumeChoice::Link(value.to_string());
        }
        match self {
            ResumeChoice::File(file) => ResumeChoice::File(file),
            _ => ResumeChoice::Missing,
        }
    }

    pub fn reference(&self) -> Option<ResumeReference> {
        match self {
            ResumeChoice::File(file) => Some(ResumeReference::File(file.clone())),
            ResumeChoice::Link(url) if is_well_formed_url(url) => Some(ResumeReference::Link {
                url: url.trim().to_string(),
            }),
            _ => None,
        }
    }

    pub fn from_reference(reference: &ResumeReference) -> Self {
        match reference {
            ResumeReference::File(file) => ResumeChoice::File(file.clone()),
            ResumeReference::Link { url } => ResumeChoice::Link(url.clone()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            ResumeChoice::File(file) => file.name.clone(),
            ResumeChoice::Link(url) if !url.is_empty() => url.clone(),
            _ => "Not provided".to_string(),
        }
    }
}
