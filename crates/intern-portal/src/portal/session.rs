use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::domain::{AuthGrant, LoginCredentials, RegisterData, User};
use super::service::{AuthService, ServiceError};
use super::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

/// Authentication state shared with guards and pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub loading: bool,
}

impl SessionState {
    /// State before durable storage has been consulted.
    pub const fn initial() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            loading: true,
        }
    }

    pub const fn signed_out() -> Self {
        Self {
            user: None,
            token: None,
            is_authenticated: false,
            loading: false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    SetLoading(bool),
    LoginSuccess { user: User, token: String },
    Logout,
    SetUser(User),
}

pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SetLoading(loading) => SessionState {
            loading,
            ..state.clone()
        },
        SessionAction::LoginSuccess { user, token } => SessionState {
            user: Some(user),
            token: Some(token),
            is_authenticated: true,
            loading: false,
        },
        SessionAction::Logout => SessionState::signed_out(),
        SessionAction::SetUser(user) => SessionState {
            user: Some(user),
            ..state.clone()
        },
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("invalid user record: {0}")]
    Record(#[from] serde_json::Error),
    #[error("no active session")]
    NotAuthenticated,
}

/// Owner of the authentication state, persisting it through [`SessionStorage`].
///
/// All transitions go through [`reduce`]; every new state is published on a watch channel.
pub struct SessionStore<A, S> {
    auth: Arc<A>,
    storage: Arc<S>,
    state: watch::Sender<SessionState>,
}

impl<A, S> SessionStore<A, S>
where
    A: AuthService + 'static,
    S: SessionStorage + 'static,
{
    pub fn new(auth: Arc<A>, storage: Arc<S>) -> Self {
        let (state, _) = watch::channel(SessionState::initial());
        Self {
            auth,
            storage,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn auth(&self) -> &Arc<A> {
        &self.auth
    }

    fn dispatch(&self, action: SessionAction) {
        self.state.send_modify(|state| {
            let next = reduce(state, action);
            *state = next;
        });
    }

    /// Resolve the session from durable storage. Unreadable records count as no session.
    pub fn initialize(&self) -> SessionState {
        match self.restore() {
            Ok(Some(grant)) => {
                debug!(user_id = %grant.user.id, "restored persisted session");
                self.dispatch(SessionAction::LoginSuccess {
                    user: grant.user,
                    token: grant.token,
                });
            }
            Ok(None) => debug!("no persisted session"),
            Err(error) => warn!(%error, "ignoring unreadable persisted session"),
        }
        self.dispatch(SessionAction::SetLoading(false));
        self.state()
    }

    fn restore(&self) -> Result<Option<AuthGrant>, SessionError> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        match (token, user) {
            (Some(token), Some(raw)) if !token.is_empty() && !raw.is_empty() => {
                let user: User = serde_json::from_str(&raw)?;
                Ok(Some(AuthGrant { user, token }))
            }
            _ => Ok(None),
        }
    }

    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, SessionError> {
        self.dispatch(SessionAction::SetLoading(true));
        let outcome = self.auth.login(credentials).await;
        self.establish(outcome)
    }

    pub async fn register(&self, data: &RegisterData) -> Result<User, SessionError> {
        self.dispatch(SessionAction::SetLoading(true));
        let outcome = self.auth.register(data).await;
        self.establish(outcome)
    }

    fn establish(&self, outcome: Result<AuthGrant, ServiceError>) -> Result<User, SessionError> {
        let persisted = outcome
            .map_err(SessionError::from)
            .and_then(|grant| self.persist(&grant).map(|()| grant));

        match persisted {
            Ok(AuthGrant { user, token }) => {
                info!(user_id = %user.id, "session established");
                self.dispatch(SessionAction::LoginSuccess {
                    user: user.clone(),
                    token,
                });
                Ok(user)
            }
            Err(error) => {
                warn!(%error, "sign-in failed");
                self.dispatch(SessionAction::SetLoading(false));
                Err(error)
            }
        }
    }

    /// Write the user record, then the token. A failed write leaves neither key behind.
    fn persist(&self, grant: &AuthGrant) -> Result<(), SessionError> {
        let user = serde_json::to_string(&grant.user)?;
        let written = self
            .storage
            .set(USER_KEY, &user)
            .and_then(|()| self.storage.set(TOKEN_KEY, &grant.token));

        if let Err(error) = written {
            for key in [USER_KEY, TOKEN_KEY] {
                if let Err(cleanup) = self.storage.remove(key) {
                    warn!(error = %cleanup, key, "failed to discard partial session record");
                }
            }
            return Err(error.into());
        }
        Ok(())
    }

    /// Clear persisted credentials and sign out. Storage failures are logged only.
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(error) = self.storage.remove(key) {
                warn!(%error, key, "failed to clear persisted session key");
            }
        }
        self.dispatch(SessionAction::Logout);
        info!("session cleared");
    }

    /// Re-fetch the current user for the held token; any failure signs out.
    pub async fn refresh_user(&self) -> Result<User, SessionError> {
        let Some(token) = self.token() else {
            self.logout();
            return Err(SessionError::NotAuthenticated);
        };

        match self.auth.current_user(&token).await {
            Ok(user) => {
                match serde_json::to_string(&user) {
                    Ok(raw) => {
                        if let Err(error) = self.storage.set(USER_KEY, &raw) {
                            warn!(%error, "failed to persist refreshed user");
                        }
                    }
                    Err(error) => warn!(%error, "failed to encode refreshed user"),
                }
                self.dispatch(SessionAction::SetUser(user.clone()));
                Ok(user)
            }
            Err(error) => {
                warn!(%error, "refreshing user failed");
                self.logout();
                Err(error.into())
            }
        }
    }

    /// Pass a collaborator result through, signing out first when it was rejected as
    /// unauthorized.
    pub fn intercept<T>(&self, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
        if let Err(error) = &result {
            if error.is_unauthorized() {
                warn!("collaborator rejected session token");
                self.logout();
            }
        }
        result
    }
}
