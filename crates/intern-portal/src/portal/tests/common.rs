use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use serde_json::Value;

use crate::portal::domain::{
    ApiResponse, ApplicationSubmission, Attachment, AuthGrant, LoginCredentials, RegisterData,
    ResumeReference, SubmissionReceipt, UploadKind, User,
};
use crate::portal::service::{
    ApplicationService, AuthService, MockPortalService, ServiceError, DEMO_EMAIL, DEMO_PASSWORD,
};
use crate::portal::storage::{MemoryStorage, SessionStorage, StorageError, USER_KEY};
use crate::portal::validation::ApplicationField;
use crate::portal::wizard::{ApplicationDraft, ApplicationWizard, WizardStep};
use crate::portal::SessionStore;

pub(super) const PERSONAL: [(ApplicationField, &str); 9] = [
    (ApplicationField::FirstName, "Ada"),
    (ApplicationField::LastName, "Lovelace"),
    (ApplicationField::Email, "ada@example.com"),
    (ApplicationField::Phone, "5551234567"),
    (ApplicationField::DateOfBirth, "2002-12-10"),
    (ApplicationField::Address, "12 Market Street"),
    (ApplicationField::City, "Austin"),
    (ApplicationField::State, "TX"),
    (ApplicationField::ZipCode, "78701"),
];

pub(super) const EDUCATION: [(ApplicationField, &str); 5] = [
    (ApplicationField::Degree, "BSc"),
    (ApplicationField::FieldOfStudy, "Computer Science"),
    (ApplicationField::University, "UT Austin"),
    (ApplicationField::GraduationYear, "2026"),
    (ApplicationField::Skills, "Rust, SQL and distributed systems"),
];

pub(super) const DETAILS: [(ApplicationField, &str); 3] = [
    (ApplicationField::CoverLetter, "I would love to build APIs with your team."),
    (ApplicationField::WhyInterested, "Backend focus"),
    (ApplicationField::Availability, "Full-time from June"),
];

pub(super) fn instant_service() -> Arc<MockPortalService> {
    Arc::new(MockPortalService::instant())
}

pub(super) fn demo_credentials() -> LoginCredentials {
    LoginCredentials {
        email: DEMO_EMAIL.to_string(),
        password: DEMO_PASSWORD.to_string(),
    }
}

pub(super) fn memory_store(
    service: Arc<MockPortalService>,
) -> (SessionStore<MockPortalService, MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::default();
    let store = SessionStore::new(service, Arc::new(storage.clone()));
    (store, storage)
}

pub(super) fn resume_file() -> Attachment {
    Attachment::new("ada-lovelace-cv.pdf", 48_213, "application/pdf")
}

pub(super) fn fill<S>(wizard: &mut ApplicationWizard<S>, values: &[(ApplicationField, &str)])
where
    S: ApplicationService + 'static,
{
    for (field, value) in values {
        wizard.set_text(*field, *value).expect("text field accepts input");
    }
}

/// Fill and advance until the wizard shows `target`.
pub(super) fn advance_to<S>(wizard: &mut ApplicationWizard<S>, target: WizardStep)
where
    S: ApplicationService + 'static,
{
    while wizard.step() < target {
        match wizard.step() {
            WizardStep::PersonalInfo => fill(wizard, &PERSONAL),
            WizardStep::Education => fill(wizard, &EDUCATION),
            WizardStep::Skills => fill(wizard, &DETAILS),
            WizardStep::Resume => wizard
                .set_resume_file(resume_file())
                .expect("resume accepted"),
            WizardStep::Review => break,
        }
        wizard.next().expect("step is complete");
    }
}

pub(super) fn complete_draft(internship_id: &str) -> ApplicationDraft {
    let mut draft = ApplicationDraft::for_internship(internship_id);
    for (field, value) in PERSONAL.iter().chain(&EDUCATION).chain(&DETAILS) {
        if let Some(slot) = draft.text_mut(*field) {
            *slot = (*value).to_string();
        }
    }
    draft.terms_accepted = true;
    draft
}

pub(super) fn linked_submission(internship_id: &str) -> ApplicationSubmission {
    complete_draft(internship_id).to_submission(
        ResumeReference::Link {
            url: "https://drive.google.com/file/d/ada/view".to_string(),
        },
        None,
    )
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

/// Submission collaborator whose backend is down.
pub(super) struct UnavailableSubmissions;

#[async_trait]
impl ApplicationService for UnavailableSubmissions {
    async fn submit_application(
        &self,
        _submission: &ApplicationSubmission,
    ) -> Result<ApiResponse<SubmissionReceipt>, ServiceError> {
        Err(ServiceError::Failed("Failed to submit application".to_string()))
    }

    async fn upload_file(
        &self,
        _file: &Attachment,
        _kind: UploadKind,
    ) -> Result<String, ServiceError> {
        Err(ServiceError::Failed("Failed to upload file".to_string()))
    }
}

/// Auth collaborator that has revoked every token.
pub(super) struct RevokedAuth;

#[async_trait]
impl AuthService for RevokedAuth {
    async fn login(&self, _credentials: &LoginCredentials) -> Result<AuthGrant, ServiceError> {
        Err(ServiceError::InvalidCredentials)
    }

    async fn register(&self, _data: &RegisterData) -> Result<AuthGrant, ServiceError> {
        Err(ServiceError::Failed("Registration failed".to_string()))
    }

    async fn current_user(&self, _token: &str) -> Result<User, ServiceError> {
        Err(ServiceError::Unauthorized)
    }

    async fn refresh_token(&self, _token: &str) -> Result<String, ServiceError> {
        Err(ServiceError::Unauthorized)
    }
}

/// Memory storage that refuses to write the user record.
#[derive(Default)]
pub(super) struct UserWriteFails {
    pub(super) inner: MemoryStorage,
}

impl SessionStorage for UserWriteFails {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == USER_KEY {
            return Err(StorageError::Unavailable("disk full".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}
