use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::catalog;
use super::domain::{
    ApiResponse, ApplicationId, ApplicationSubmission, Attachment, AuthGrant, Internship,
    LoginCredentials, RegisterData, SubmissionReceipt, UploadKind, User, UserRole,
};
use super::listing::ListingFilters;

pub const DEMO_EMAIL: &str = "user@example.com";
pub const DEMO_PASSWORD: &str = "password";

/// Failure returned by any collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("session expired or token rejected")]
    Unauthorized,
    #[error("{0}")]
    Failed(String),
}

impl ServiceError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ServiceError::Unauthorized)
    }
}

/// Credential checks and account lookups.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthGrant, ServiceError>;
    async fn register(&self, data: &RegisterData) -> Result<AuthGrant, ServiceError>;
    async fn current_user(&self, token: &str) -> Result<User, ServiceError>;
    async fn refresh_token(&self, token: &str) -> Result<String, ServiceError>;
}

/// Read-only internship queries.
#[async_trait]
pub trait InternshipService: Send + Sync {
    async fn internships_by_role(&self, role_id: &str) -> Result<Vec<Internship>, ServiceError>;
    async fn internship_by_id(&self, id: &str) -> Result<Option<Internship>, ServiceError>;
    async fn search_internships(
        &self,
        query: &str,
        filters: &ListingFilters,
    ) -> Result<Vec<Internship>, ServiceError>;
}

/// Application intake.
#[async_trait]
pub trait ApplicationService: Send + Sync {
    async fn submit_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<ApiResponse<SubmissionReceipt>, ServiceError>;
    async fn upload_file(&self, file: &Attachment, kind: UploadKind) -> Result<String, ServiceError>;
}

/// Per-call pauses imitating network round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockLatency {
    pub login: Duration,
    pub register: Duration,
    pub current_user: Duration,
    pub refresh_token: Duration,
    pub by_role: Duration,
    pub by_id: Duration,
    pub search: Duration,
    pub submit: Duration,
    pub upload: Duration,
}

impl MockLatency {
    pub const fn realistic() -> Self {
        Self {
            login: Duration::from_millis(1000),
            register: Duration::from_millis(1500),
            current_user: Duration::from_millis(500),
            refresh_token: Duration::from_millis(500),
            by_role: Duration::from_millis(800),
            by_id: Duration::from_millis(500),
            search: Duration::from_millis(600),
            submit: Duration::from_millis(2000),
            upload: Duration::from_millis(1500),
        }
    }

    pub const fn none() -> Self {
        Self {
            login: Duration::ZERO,
            register: Duration::ZERO,
            current_user: Duration::ZERO,
            refresh_token: Duration::ZERO,
            by_role: Duration::ZERO,
            by_id: Duration::ZERO,
            search: Duration::ZERO,
            submit: Duration::ZERO,
            upload: Duration::ZERO,
        }
    }

    pub const fn from_flag(simulate: bool) -> Self {
        if simulate {
            Self::realistic()
        } else {
            Self::none()
        }
    }
}

impl Default for MockLatency {
    fn default() -> Self {
        Self::realistic()
    }
}

async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}

/// Millisecond stamps that never repeat within a process, used for ids and tokens.
#[derive(Debug, Default)]
struct Stamp {
    last: AtomicI64,
}

impl Stamp {
    fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(actual) => previous = actual,
            }
        }
    }
}

/// In-process stand-in for the portal backend.
///
/// Tokens it issues are remembered so `current_user` can resolve them; anything else is
/// treated as unauthorized.
#[derive(Debug, Default)]
pub struct MockPortalService {
    latency: MockLatency,
    sessions: Mutex<HashMap<String, User>>,
    stamp: Stamp,
}

impl MockPortalService {
    pub fn new(latency: MockLatency) -> Self {
        Self {
            latency,
            sessions: Mutex::new(HashMap::new()),
            stamp: Stamp::default(),
        }
    }

    pub fn instant() -> Self {
        Self::new(MockLatency::none())
    }

    fn remember(&self, token: &str, user: &User) -> Result<(), ServiceError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| ServiceError::Failed("session registry unavailable".to_string()))?;
        guard.insert(token.to_string(), user.clone());
        Ok(())
    }

    fn grant(&self, user: User) -> Result<AuthGrant, ServiceError> {
        let token = format!("mock-jwt-token-{}", self.stamp.next());
        self.remember(&token, &user)?;
        Ok(AuthGrant { user, token })
    }

    /// Resolve a token without simulated latency; used by the HTTP layer for bearer checks.
    pub fn user_for_token(&self, token: &str) -> Option<User> {
        self.sessions
            .lock()
            .ok()
            .and_then(|guard| guard.get(token).cloned())
    }

    fn derived_listings(&self, role_id: &str, template: &Internship) -> Vec<Internship> {
        // Stable per role so repeated fetches agree.
        let spread = role_id.bytes().map(u32::from).sum::<u32>() % 5;
        let total = 3 + spread;
        (0..total)
            .map(|index| Internship {
                id: format!("{role_id}-{}", index + 10),
                title: format!("{} {}", template.title, index + 2),
                company: format!("{} {}", template.company, index + 2),
                stipend: format!("${}/month", 1200 + index * 200),
                application_count: 10 + (spread * 17 + index * 23) % 100,
                ..template.clone()
            })
            .collect()
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

#[async_trait]
impl AuthService for MockPortalService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthGrant, ServiceError> {
        pause(self.latency.login).await;

        if credentials.email != DEMO_EMAIL || credentials.password != DEMO_PASSWORD {
            warn!(email = %credentials.email, "rejected login attempt");
            return Err(ServiceError::InvalidCredentials);
        }

        let user = User {
            id: "1".to_string(),
            email: credentials.email.clone(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            role: UserRole::User,
            created_at: now_iso(),
        };
        info!(user_id = %user.id, "issued mock session token");
        self.grant(user)
    }

    async fn register(&self, data: &RegisterData) -> Result<AuthGrant, ServiceError> {
        pause(self.latency.register).await;

        let user = User {
            id: self.stamp.next().to_string(),
            email: data.email.clone(),
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            role: UserRole::User,
            created_at: now_iso(),
        };
        info!(user_id = %user.id, "registered mock account");
        self.grant(user)
    }

    async fn current_user(&self, token: &str) -> Result<User, ServiceError> {
        pause(self.latency.current_user).await;
        self.user_for_token(token).ok_or(ServiceError::Unauthorized)
    }

    async fn refresh_token(&self, token: &str) -> Result<String, ServiceError> {
        pause(self.latency.refresh_token).await;

        let user = self.user_for_token(token).ok_or(ServiceError::Unauthorized)?;
        let refreshed = format!("refreshed-{token}");
        self.remember(&refreshed, &user)?;
        Ok(refreshed)
    }
}

#[async_trait]
impl InternshipService for MockPortalService {
    async fn internships_by_role(&self, role_id: &str) -> Result<Vec<Internship>, ServiceError> {
        pause(self.latency.by_role).await;

        let seeds = catalog::internships();
        let template = seeds
            .first()
            .cloned()
            .ok_or_else(|| ServiceError::Failed("Failed to fetch internships".to_string()))?;

        let mut listings: Vec<Internship> = seeds
            .into_iter()
            .filter(|internship| internship.role_id == role_id)
            .collect();
        listings.extend(self.derived_listings(role_id, &template));

        debug!(role_id, count = listings.len(), "served internships for role");
        Ok(listings)
    }

    async fn internship_by_id(&self, id: &str) -> Result<Option<Internship>, ServiceError> {
        pause(self.latency.by_id).await;

        let seeds = catalog::internships();
        if let Some(found) = seeds.iter().find(|internship| internship.id == id) {
            return Ok(Some(found.clone()));
        }

        if !id.contains('-') {
            return Ok(None);
        }

        let template = seeds
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Failed("Failed to fetch internship details".to_string()))?;
        Ok(Some(Internship {
            id: id.to_string(),
            title: "Sample Internship Position".to_string(),
            company: "Tech Company Inc.".to_string(),
            ..template
        }))
    }

    async fn search_internships(
        &self,
        query: &str,
        filters: &ListingFilters,
    ) -> Result<Vec<Internship>, ServiceError> {
        pause(self.latency.search).await;

        let needle = query.trim().to_lowercase();
        let results = catalog::internships()
            .into_iter()
            .filter(|internship| {
                needle.is_empty()
                    || internship.title.to_lowercase().contains(&needle)
                    || internship.company.to_lowercase().contains(&needle)
                    || internship
                        .skills
                        .iter()
                        .any(|skill| skill.to_lowercase().contains(&needle))
            })
            .filter(|internship| match filters.location_type {
                Some(kind) => internship.location_type == kind,
                None => true,
            })
            .collect();
        Ok(results)
    }
}

#[async_trait]
impl ApplicationService for MockPortalService {
    async fn submit_application(
        &self,
        submission: &ApplicationSubmission,
    ) -> Result<ApiResponse<SubmissionReceipt>, ServiceError> {
        pause(self.latency.submit).await;

        let application_id = ApplicationId(format!("app-{}", self.stamp.next()));
        info!(
            %application_id,
            internship_id = %submission.internship_id,
            "accepted application"
        );
        Ok(ApiResponse {
            success: true,
            data: SubmissionReceipt { application_id },
            message: "Application submitted successfully!".to_string(),
        })
    }

    async fn upload_file(&self, file: &Attachment, kind: UploadKind) -> Result<String, ServiceError> {
        pause(self.latency.upload).await;

        Ok(format!(
            "https://mock-storage.com/{}/{}-{}",
            kind.label(),
            self.stamp.next(),
            file.name
        ))
    }
}
