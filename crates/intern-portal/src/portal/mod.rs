//! Internship portal core: session handling, page guards, catalog queries, and the
//! multi-step application wizard, backed by an in-process mock of the portal backend.

pub mod catalog;
pub mod domain;
pub mod guard;
pub mod listing;
pub mod router;
pub mod service;
pub mod session;
pub mod storage;
pub mod validation;
pub mod wizard;

#[cfg(test)]
mod tests;

pub use domain::{
    ApiResponse, ApplicationId, ApplicationSubmission, Attachment, AuthGrant, EducationDetails,
    ExperienceDetails, Internship, InternshipRole, LocationType, LoginCredentials, RegisterData,
    ResumeReference, SubmissionReceipt, UploadKind, User, UserRole,
};
pub use guard::{navigate, post_login_destination, protect, GuardDecision, Route};
pub use listing::{filter_internships, search_roles, ListingFilters};
pub use router::{portal_router, PortalBackend};
pub use service::{
    ApplicationService, AuthService, InternshipService, MockLatency, MockPortalService,
    ServiceError,
};
pub use session::{reduce, SessionAction, SessionError, SessionState, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use validation::{ApplicationField, FieldErrors, LoginField, RegisterField};
pub use wizard::{
    ApplicationDraft, ApplicationReview, ApplicationWizard, ResumeChoice, WizardError,
    WizardProgress, WizardStatus, WizardStep,
};
