//! Multi-step application form controller.
//!
//! The wizard owns a typed draft, the resume choice, and the optional portfolio. Each edit
//! re-validates the touched field; advancing re-validates the whole step; submitting
//! re-validates everything and hands the assembled payload to an [`ApplicationService`].

mod draft;
mod step;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{ApplicationId, Attachment};
use super::service::{ApplicationService, ServiceError};
use super::validation::{is_well_formed_url, ApplicationField, FieldErrors};

pub use draft::{ApplicationDraft, ResumeChoice};
pub use step::WizardStep;

pub const INVALID_LINK: &str = "Please enter a valid URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardStatus {
    Editing,
    Submitting,
    Completed(ApplicationId),
    Cancelled,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors<ApplicationField>),
    #[error("Please upload a resume or provide a valid Google Drive link before proceeding.")]
    ResumeMissing,
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,
    #[error("submission is only available on the final step")]
    NotOnFinalStep,
    #[error("{field} is not a text field")]
    NotText { field: &'static str },
    #[error("application already submitted as {0}")]
    AlreadySubmitted(ApplicationId),
    #[error("application is being submitted")]
    InFlight,
    #[error("application was cancelled")]
    Cancelled,
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Rejected(String),
}

/// Summary shown on the review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationReview {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub university: String,
    pub degree: String,
    pub graduation_year: String,
    pub resume: String,
    pub portfolio: String,
}

impl fmt::Display for ApplicationReview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Email: {}", self.email)?;
        writeln!(f, "Phone: {}", self.phone)?;
        writeln!(f, "University: {}", self.university)?;
        writeln!(f, "Degree: {}", self.degree)?;
        writeln!(f, "Graduation Year: {}", self.graduation_year)?;
        writeln!(f, "Resume: {}", self.resume)?;
        write!(f, "Portfolio: {}", self.portfolio)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WizardProgress {
    pub step: WizardStep,
    pub fraction: f32,
}

impl WizardProgress {
    pub fn labels(&self) -> [&'static str; WizardStep::COUNT] {
        WizardStep::ALL.map(WizardStep::label)
    }
}

impl fmt::Display for WizardProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Step {} of {}: {}",
            self.step.index() + 1,
            WizardStep::COUNT,
            self.step.label()
        )
    }
}

pub struct ApplicationWizard<S> {
    service: Arc<S>,
    step: WizardStep,
    draft: ApplicationDraft,
    resume: ResumeChoice,
    portfolio: Option<Attachment>,
    errors: FieldErrors<ApplicationField>,
    last_failure: Option<String>,
    status: WizardStatus,
}

impl<S> ApplicationWizard<S>
where
    S: ApplicationService + 'static,
{
    pub fn new(service: Arc<S>, internship_id: impl Into<String>) -> Self {
        Self {
            service,
            step: WizardStep::PersonalInfo,
            draft: ApplicationDraft::for_internship(internship_id),
            resume: ResumeChoice::Missing,
            portfolio: None,
            errors: FieldErrors::new(),
            last_failure: None,
            status: WizardStatus::Editing,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn status(&self) -> &WizardStatus {
        &self.status
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    pub fn resume(&self) -> &ResumeChoice {
        &self.resume
    }

    pub fn portfolio(&self) -> Option<&Attachment> {
        self.portfolio.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors<ApplicationField> {
        &self.errors
    }

    /// Message from the most recent failed submission, if any.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    fn ensure_editing(&self) -> Result<(), WizardError> {
        match &self.status {
            WizardStatus::Editing => Ok(()),
            WizardStatus::Submitting => Err(WizardError::InFlight),
            WizardStatus::Completed(id) => Err(WizardError::AlreadySubmitted(id.clone())),
            WizardStatus::Cancelled => Err(WizardError::Cancelled),
        }
    }

    pub fn set_text(
        &mut self,
        field: ApplicationField,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.ensure_editing()?;
        let slot = self
            .draft
            .text_mut(field)
            .ok_or(WizardError::NotText { field: field.label() })?;
        *slot = value.into();
        self.revalidate(field);
        Ok(())
    }

    pub fn set_has_experience(&mut self, value: bool) -> Result<(), WizardError> {
        self.ensure_editing()?;
        self.draft.has_experience = value;
        Ok(())
    }

    pub fn set_terms_accepted(&mut self, value: bool) -> Result<(), WizardError> {
        self.ensure_editing()?;
        self.draft.terms_accepted = value;
        self.revalidate(ApplicationField::TermsAccepted);
        Ok(())
    }

    fn revalidate(&mut self, field: ApplicationField) {
        let outcome = self.draft.check(field);
        self.errors.apply(field, outcome);
    }

    /// Attach a resume file, replacing any link.
    pub fn set_resume_file(&mut self, file: Attachment) -> Result<(), WizardError> {
        self.ensure_editing()?;
        debug!(name = %file.name, "resume file attached");
        self.resume = ResumeChoice::File(file);
        Ok(())
    }

    /// Record the resume link input. A non-empty value replaces any file.
    pub fn set_resume_link(&mut self, value: &str) -> Result<(), WizardError> {
        self.ensure_editing()?;
        let current = std::mem::take(&mut self.resume);
        self.resume = current.with_link(value);
        Ok(())
    }

    pub fn set_portfolio(&mut self, file: Option<Attachment>) -> Result<(), WizardError> {
        self.ensure_editing()?;
        self.portfolio = file;
        Ok(())
    }

    pub fn resume_provided(&self) -> bool {
        self.resume.is_provided()
    }

    /// Inline error for a typed link that does not parse.
    pub fn resume_link_error(&self) -> Option<&'static str> {
        match self.resume.link() {
            Some(url) if !url.is_empty() && !is_well_formed_url(url) => Some(INVALID_LINK),
            _ => None,
        }
    }

    /// Validate the current step and move forward. Stays on the final step.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        self.ensure_editing()?;

        if self.step == WizardStep::Resume {
            if !self.resume_provided() {
                return Err(WizardError::ResumeMissing);
            }
        } else {
            let fields = self.step.fields();
            let step_errors = self.draft.validate(fields);
            for &field in fields {
                self.errors.apply(field, step_errors.get(field));
            }
            if !step_errors.is_empty() {
                debug!(step = self.step.label(), failures = step_errors.len(), "step blocked");
                return Err(WizardError::Invalid(step_errors));
            }
        }

        if let Some(next) = self.step.next() {
            self.step = next;
        }
        Ok(self.step)
    }

    /// Move back one step without validating. Returns `false` on the first step.
    pub fn previous(&mut self) -> bool {
        if self.ensure_editing().is_err() {
            return false;
        }
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        self.status == WizardStatus::Editing
            && self.step.is_final()
            && self.resume_provided()
            && self.draft.terms_accepted
            && self.errors.is_empty()
    }

    /// Validate everything and hand the application to the submission service.
    ///
    /// On failure the draft is kept and the wizard stays on the final step.
    pub async fn submit(&mut self) -> Result<ApplicationId, WizardError> {
        self.ensure_editing()?;
        if !self.step.is_final() {
            return Err(WizardError::NotOnFinalStep);
        }

        self.errors = self.draft.validate_all();
        let Some(resume) = self.resume.reference() else {
            return Err(WizardError::ResumeMissing);
        };
        if !self.draft.terms_accepted {
            return Err(WizardError::TermsNotAccepted);
        }
        if !self.errors.is_empty() {
            return Err(WizardError::Invalid(self.errors.clone()));
        }

        let payload = self.draft.to_submission(resume, self.portfolio.clone());
        self.status = WizardStatus::Submitting;
        self.last_failure = None;

        let outcome = self.service.submit_application(&payload).await;
        match outcome {
            Ok(response) if response.success => {
                let id = response.data.application_id;
                info!(application_id = %id, "application submitted");
                self.discard();
                self.status = WizardStatus::Completed(id.clone());
                Ok(id)
            }
            Ok(response) => {
                warn!(message = %response.message, "submission rejected");
                self.status = WizardStatus::Editing;
                self.last_failure = Some(response.message.clone());
                Err(WizardError::Rejected(response.message))
            }
            Err(error) => {
                warn!(%error, "submission failed");
                self.status = WizardStatus::Editing;
                self.last_failure = Some(error.to_string());
                Err(error.into())
            }
        }
    }

    /// Abandon the application. Has no effect once submission completed.
    pub fn cancel(&mut self) -> &WizardStatus {
        if matches!(self.status, WizardStatus::Editing) {
            self.discard();
            self.status = WizardStatus::Cancelled;
            debug!("application cancelled");
        }
        &self.status
    }

    fn discard(&mut self) {
        let internship_id = std::mem::take(&mut self.draft.internship_id);
        self.draft = ApplicationDraft::for_internship(internship_id);
        self.resume = ResumeChoice::Missing;
        self.portfolio = None;
        self.errors = FieldErrors::new();
    }

    pub fn review(&self) -> ApplicationReview {
        let draft = &self.draft;
        ApplicationReview {
            name: format!("{} {}", draft.first_name, draft.last_name),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            university: draft.university.clone(),
            degree: format!("{} in {}", draft.degree, draft.field_of_study),
            graduation_year: draft.graduation_year.clone(),
            resume: self.resume.describe(),
            portfolio: self
                .portfolio
                .as_ref()
                .map(|file| file.name.clone())
                .unwrap_or_else(|| "Not provided".to_string()),
        }
    }

    pub fn progress(&self) -> WizardProgress {
        WizardProgress {
            step: self.step,
            fraction: (self.step.index() + 1) as f32 / WizardStep::COUNT as f32,
        }
    }
}
