//! Route table and access decisions for the portal pages.

use super::session::SessionState;

pub const LOGIN_PATH: &str = "/login";
pub const DEFAULT_AFTER_LOGIN: &str = "/roles";
pub const FALLBACK_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Roles,
    Internships { role: String },
    InternshipDetails { id: String },
}

impl Route {
    /// Match a request path against the route table; `None` for unknown paths.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["register"] => Some(Route::Register),
            ["roles"] => Some(Route::Roles),
            ["internships", role] => Some(Route::Internships {
                role: (*role).to_string(),
            }),
            ["internship", id] => Some(Route::InternshipDetails {
                id: (*id).to_string(),
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => FALLBACK_PATH.to_string(),
            Route::Login => LOGIN_PATH.to_string(),
            Route::Register => "/register".to_string(),
            Route::Roles => DEFAULT_AFTER_LOGIN.to_string(),
            Route::Internships { role } => format!("/internships/{role}"),
            Route::InternshipDetails { id } => format!("/internship/{id}"),
        }
    }

    pub const fn requires_auth(&self) -> bool {
        matches!(
            self,
            Route::Roles | Route::Internships { .. } | Route::InternshipDetails { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still resolving; show a placeholder.
    Loading,
    Redirect { to: String, from: Option<String> },
    Render,
}

/// Decision for a protected page.
pub fn protect(state: &SessionState, requested: &str) -> GuardDecision {
    if state.loading {
        GuardDecision::Loading
    } else if !state.is_authenticated {
        GuardDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(requested.to_string()),
        }
    } else {
        GuardDecision::Render
    }
}

/// Decision for any path: unknown paths fall back home, public routes always render.
pub fn navigate(state: &SessionState, path: &str) -> GuardDecision {
    match Route::parse(path) {
        None => GuardDecision::Redirect {
            to: FALLBACK_PATH.to_string(),
            from: None,
        },
        Some(route) if route.requires_auth() => protect(state, path),
        Some(_) => GuardDecision::Render,
    }
}

/// Where to send the user once login succeeds.
pub fn post_login_destination(from: Option<&str>) -> String {
    from.filter(|path| {
        Route::parse(path).is_some_and(|route| !matches!(route, Route::Login | Route::Register))
    })
    .map(str::to_string)
    .unwrap_or_else(|| DEFAULT_AFTER_LOGIN.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(authenticated: bool) -> SessionState {
        SessionState {
            is_authenticated: authenticated,
            loading: false,
            ..SessionState::initial()
        }
    }

    #[test]
    fn loading_state_defers_the_decision() {
        assert_eq!(
            protect(&SessionState::initial(), "/roles"),
            GuardDecision::Loading
        );
    }

    #[test]
    fn anonymous_visitor_is_sent_to_login_with_origin() {
        assert_eq!(
            navigate(&resolved(false), "/internships/data-science"),
            GuardDecision::Redirect {
                to: "/login".to_string(),
                from: Some("/internships/data-science".to_string()),
            }
        );
    }

    #[test]
    fn public_and_unknown_routes() {
        let state = resolved(false);
        assert_eq!(navigate(&state, "/register"), GuardDecision::Render);
        assert_eq!(navigate(&state, "/"), GuardDecision::Render);
        assert_eq!(
            navigate(&state, "/admin/settings"),
            GuardDecision::Redirect {
                to: "/".to_string(),
                from: None,
            }
        );
        assert_eq!(navigate(&resolved(true), "/internship/2"), GuardDecision::Render);
    }

    #[test]
    fn login_returns_to_origin_or_roles() {
        assert_eq!(post_login_destination(None), "/roles");
        assert_eq!(post_login_destination(Some("/login")), "/roles");
        assert_eq!(post_login_destination(Some("/nowhere/at/all")), "/roles");
        assert_eq!(
            post_login_destination(Some("/internship/3")),
            "/internship/3"
        );
    }

    #[test]
    fn query_string_survives_the_login_round_trip() {
        let requested = "/internships/data-science?search=python&locationType=Remote";
        let GuardDecision::Redirect { to, from } = navigate(&resolved(false), requested) else {
            panic!("anonymous visitor must be redirected");
        };
        assert_eq!(to, "/login");
        assert_eq!(from.as_deref(), Some(requested));
        assert_eq!(post_login_destination(from.as_deref()), requested);
    }
}
