use super::common::*;
use std::sync::Arc;

use crate::portal::domain::{RegisterData, User, UserRole};
use crate::portal::service::ServiceError;
use crate::portal::session::{reduce, SessionAction, SessionError, SessionState, SessionStore};
use crate::portal::storage::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};

fn stored_user() -> User {
    User {
        id: "42".to_string(),
        email: "grace@example.com".to_string(),
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        role: UserRole::User,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

fn seeded_storage(token: &str, user_record: &str) -> MemoryStorage {
    let storage = MemoryStorage::default();
    storage.set(TOKEN_KEY, token).expect("seed token");
    storage.set(USER_KEY, user_record).expect("seed user");
    storage
}

#[test]
fn initialize_without_records_resolves_signed_out() {
    let (store, _) = memory_store(instant_service());
    assert!(store.state().loading);

    let state = store.initialize();
    assert_eq!(state, SessionState::signed_out());
}

#[test]
fn initialize_restores_persisted_session() {
    let record = serde_json::to_string(&stored_user()).expect("encode user");
    let storage = seeded_storage("mock-jwt-token-1", &record);
    let store = SessionStore::new(instant_service(), Arc::new(storage));

    let state = store.initialize();
    assert!(state.is_authenticated);
    assert!(!state.loading);
    assert_eq!(state.token.as_deref(), Some("mock-jwt-token-1"));
    assert_eq!(state.user, Some(stored_user()));
}

#[test]
fn corrupt_user_record_counts_as_no_session() {
    let storage = seeded_storage("mock-jwt-token-1", "{\"id\": 42");
    let store = SessionStore::new(instant_service(), Arc::new(storage));

    let state = store.initialize();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
}

#[tokio::test]
async fn demo_credentials_authenticate_and_persist() {
    let (store, storage) = memory_store(instant_service());
    store.initialize();

    let user = store.login(&demo_credentials()).await.expect("login");
    assert_eq!(user.id, "1");
    assert_eq!(user.display_name(), "John Doe");

    let state = store.state();
    assert!(state.is_authenticated);
    let token = state.token.expect("token issued");
    assert!(token.starts_with("mock-jwt-token-"));

    let snapshot = storage.snapshot();
    assert_eq!(snapshot.get(TOKEN_KEY), Some(&token));
    let persisted: User =
        serde_json::from_str(snapshot.get(USER_KEY).expect("user persisted")).expect("decode");
    assert_eq!(persisted, user);
}

#[tokio::test]
async fn wrong_password_is_rejected_and_session_stays_signed_out() {
    let (store, storage) = memory_store(instant_service());
    store.initialize();

    let mut credentials = demo_credentials();
    credentials.password = "hunter22".to_string();

    match store.login(&credentials).await {
        Err(SessionError::Service(ServiceError::InvalidCredentials)) => {}
        other => panic!("expected invalid credentials, got {other:?}"),
    }

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(storage.snapshot().is_empty());
}

#[tokio::test]
async fn failed_user_write_leaves_no_token_behind() {
    let storage = UserWriteFails::default();
    let entries = storage.inner.clone();
    let store = SessionStore::new(instant_service(), Arc::new(storage));
    store.initialize();

    match store.login(&demo_credentials()).await {
        Err(SessionError::Storage(_)) => {}
        other => panic!("expected storage failure, got {other:?}"),
    }

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert!(entries.snapshot().is_empty());
}

#[tokio::test]
async fn rejection_message_is_human_readable() {
    let (store, _) = memory_store(instant_service());
    let mut credentials = demo_credentials();
    credentials.email = "someone@example.com".to_string();

    let error = store.login(&credentials).await.expect_err("rejected");
    assert_eq!(error.to_string(), "Invalid email or password");
}

#[tokio::test]
async fn register_establishes_a_fresh_account() {
    let (store, storage) = memory_store(instant_service());
    store.initialize();

    let data = RegisterData {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: "cobol59".to_string(),
        confirm_password: "cobol59".to_string(),
    };
    let user = store.register(&data).await.expect("register");

    assert!(user.id.chars().all(|c| c.is_ascii_digit()));
    assert_eq!(user.email, "grace@example.com");
    assert!(store.state().is_authenticated);
    assert_eq!(storage.snapshot().len(), 2);
}

#[tokio::test]
async fn logout_clears_storage_and_state() {
    let (store, storage) = memory_store(instant_service());
    store.initialize();
    store.login(&demo_credentials()).await.expect("login");

    store.logout();

    let snapshot = storage.snapshot();
    assert!(!snapshot.contains_key(TOKEN_KEY));
    assert!(!snapshot.contains_key(USER_KEY));
    let state = store.state();
    assert_eq!(state.user, None);
    assert_eq!(state.token, None);
    assert!(!state.is_authenticated);
}

#[tokio::test]
async fn refresh_user_replaces_the_record_for_a_live_token() {
    let (store, _) = memory_store(instant_service());
    store.initialize();
    let user = store.login(&demo_credentials()).await.expect("login");

    let refreshed = store.refresh_user().await.expect("refresh");
    assert_eq!(refreshed.id, user.id);
    assert!(store.state().is_authenticated);
}

#[tokio::test]
async fn refresh_failure_forces_logout() {
    let record = serde_json::to_string(&stored_user()).expect("encode user");
    let storage = seeded_storage("mock-jwt-token-stale", &record);
    let store = SessionStore::new(Arc::new(RevokedAuth), Arc::new(storage.clone()));
    assert!(store.initialize().is_authenticated);

    let error = store.refresh_user().await.expect_err("revoked token");
    assert!(matches!(
        error,
        SessionError::Service(ServiceError::Unauthorized)
    ));
    assert!(!store.state().is_authenticated);
    assert!(storage.snapshot().is_empty());
}

#[tokio::test]
async fn intercepted_unauthorized_result_logs_out() {
    let (store, storage) = memory_store(instant_service());
    store.initialize();
    store.login(&demo_credentials()).await.expect("login");

    let passed: Result<u8, ServiceError> = store.intercept(Ok(7));
    assert_eq!(passed, Ok(7));
    assert!(store.state().is_authenticated);

    let failed: Result<u8, ServiceError> =
        store.intercept(Err(ServiceError::Failed("timeout".to_string())));
    assert!(failed.is_err());
    assert!(store.state().is_authenticated);

    let rejected: Result<u8, ServiceError> = store.intercept(Err(ServiceError::Unauthorized));
    assert_eq!(rejected, Err(ServiceError::Unauthorized));
    assert!(!store.state().is_authenticated);
    assert!(storage.snapshot().is_empty());
}

#[tokio::test]
async fn subscribers_observe_transitions() {
    let (store, _) = memory_store(instant_service());
    let mut observer = store.subscribe();
    assert!(observer.borrow_and_update().loading);

    store.initialize();
    assert!(observer.has_changed().expect("sender alive"));
    assert!(!observer.borrow_and_update().loading);

    store.login(&demo_credentials()).await.expect("login");
    assert!(observer.has_changed().expect("sender alive"));
    assert!(observer.borrow_and_update().is_authenticated);
}

#[test]
fn set_user_keeps_token_and_flags() {
    let authenticated = reduce(
        &SessionState::initial(),
        SessionAction::LoginSuccess {
            user: stored_user(),
            token: "t".to_string(),
        },
    );

    let mut renamed = stored_user();
    renamed.first_name = "Amazing".to_string();
    let next = reduce(&authenticated, SessionAction::SetUser(renamed.clone()));

    assert_eq!(next.user, Some(renamed));
    assert_eq!(next.token.as_deref(), Some("t"));
    assert!(next.is_authenticated);

    let loading = reduce(&next, SessionAction::SetLoading(true));
    assert!(loading.loading && loading.is_authenticated);
    assert_eq!(reduce(&loading, SessionAction::Logout), SessionState::signed_out());
}
