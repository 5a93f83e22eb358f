use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationSubmission, LocationType, LoginCredentials, RegisterData, User};
use super::listing::{filter_internships, search_roles, ListingFilters};
use super::service::{ApplicationService, AuthService, InternshipService, ServiceError};
use super::validation::{validate_login, validate_registration};
use super::wizard::{ApplicationDraft, ResumeChoice, WizardError};

/// Everything the HTTP surface needs from the backend.
pub trait PortalBackend: AuthService + InternshipService + ApplicationService {}

impl<T> PortalBackend for T where T: AuthService + InternshipService + ApplicationService {}

/// Router exposing authentication, catalog, and application intake endpoints.
pub fn portal_router<S>(service: Arc<S>) -> Router
where
    S: PortalBackend + 'static,
{
    Router::new()
        .route("/api/auth/login", post(login_handler::<S>))
        .route("/api/auth/register", post(register_handler::<S>))
        .route("/api/auth/me", get(me_handler::<S>))
        .route("/api/roles", get(roles_handler))
        .route("/api/internships", get(internships_handler::<S>))
        .route("/api/internships/:internship_id", get(internship_handler::<S>))
        .route("/api/applications", post(submit_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub struct RoleQuery {
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InternshipQuery {
    pub role: Option<String>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub location_type: Option<String>,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, Json(payload)).into_response()
}

fn service_failure(error: ServiceError) -> Response {
    match error {
        ServiceError::InvalidCredentials | ServiceError::Unauthorized => {
            error_response(StatusCode::UNAUTHORIZED, error.to_string())
        }
        ServiceError::Failed(message) => {
            error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

async fn authenticate<S>(service: &S, headers: &HeaderMap) -> Result<User, Response>
where
    S: AuthService,
{
    let token = bearer_token(headers)
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "missing bearer token"))?;
    service.current_user(token).await.map_err(service_failure)
}

pub(crate) async fn login_handler<S>(
    State(service): State<Arc<S>>,
    Json(credentials): Json<LoginCredentials>,
) -> Response
where
    S: PortalBackend + 'static,
{
    let errors = validate_login(&credentials);
    if !errors.is_empty() {
        let payload = json!({ "error": "validation failed", "fields": errors });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    match service.login(&credentials).await {
        Ok(grant) => (StatusCode::OK, Json(grant)).into_response(),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<S>>,
    Json(data): Json<RegisterData>,
) -> Response
where
    S: PortalBackend + 'static,
{
    let errors = validate_registration(&data);
    if !errors.is_empty() {
        let payload = json!({ "error": "validation failed", "fields": errors });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    match service.register(&data).await {
        Ok(grant) => (StatusCode::CREATED, Json(grant)).into_response(),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn me_handler<S>(State(service): State<Arc<S>>, headers: HeaderMap) -> Response
where
    S: PortalBackend + 'static,
{
    match authenticate(service.as_ref(), &headers).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(response) => response,
    }
}

pub(crate) async fn roles_handler(Query(query): Query<RoleQuery>) -> Response {
    let roles = search_roles(query.search.as_deref().unwrap_or_default());
    (StatusCode::OK, Json(roles)).into_response()
}

pub(crate) async fn internships_handler<S>(
    State(service): State<Arc<S>>,
    Query(query): Query<InternshipQuery>,
) -> Response
where
    S: PortalBackend + 'static,
{
    let location_type = match query.location_type.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match LocationType::parse(raw) {
            Some(kind) => Some(kind),
            None => {
                return error_response(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("unknown location type '{raw}'"),
                )
            }
        },
    };

    let listings = match query.role.as_deref().filter(|role| !role.is_empty()) {
        Some(role) => {
            let filters = ListingFilters {
                search: query.search,
                location: query.location,
                location_type,
            };
            service
                .internships_by_role(role)
                .await
                .map(|all| filter_internships(&all, &filters))
        }
        None => {
            let filters = ListingFilters {
                search: None,
                location: query.location,
                location_type,
            };
            service
                .search_internships(query.search.as_deref().unwrap_or_default(), &filters)
                .await
                .map(|all| filter_internships(&all, &filters))
        }
    };

    match listings {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn internship_handler<S>(
    State(service): State<Arc<S>>,
    Path(internship_id): Path<String>,
) -> Response
where
    S: PortalBackend + 'static,
{
    match service.internship_by_id(&internship_id).await {
        Ok(Some(internship)) => (StatusCode::OK, Json(internship)).into_response(),
        Ok(None) => error_response(
            StatusCode::NOT_FOUND,
            format!("internship {internship_id} not found"),
        ),
        Err(error) => service_failure(error),
    }
}

pub(crate) async fn submit_handler<S>(
    State(service): State<Arc<S>>,
    headers: HeaderMap,
    Json(submission): Json<ApplicationSubmission>,
) -> Response
where
    S: PortalBackend + 'static,
{
    if let Err(response) = authenticate(service.as_ref(), &headers).await {
        return response;
    }

    let errors = ApplicationDraft::from_submission(&submission).validate_all();
    if !errors.is_empty() {
        let payload = json!({ "error": "validation failed", "fields": errors });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }
    if !ResumeChoice::from_reference(&submission.resume).is_provided() {
        return error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            WizardError::ResumeMissing.to_string(),
        );
    }

    match service.submit_application(&submission).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(error) => service_failure(error),
    }
}
