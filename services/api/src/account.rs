use clap::Args;
use tracing::debug;

use crate::infra::{field_error_summary, file_session, portal_service};
use intern_portal::config::AppConfig;
use intern_portal::error::AppError;
use intern_portal::portal::validation::{validate_login, validate_registration};
use intern_portal::portal::{
    navigate, post_login_destination, GuardDecision, LoginCredentials, RegisterData,
};

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    /// Account email (the mock backend accepts user@example.com)
    #[arg(long)]
    pub(crate) email: String,
    /// Account password (the mock backend accepts "password")
    #[arg(long)]
    pub(crate) password: String,
    /// Page that asked for sign-in; used to report where to continue
    #[arg(long)]
    pub(crate) from: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) first_name: String,
    #[arg(long)]
    pub(crate) last_name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
    #[arg(long)]
    pub(crate) confirm_password: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WhoamiArgs {
    /// Also report whether this page would render for the current session
    #[arg(long)]
    pub(crate) page: Option<String>,
}

pub(crate) async fn login(config: &AppConfig, args: LoginArgs) -> Result<(), AppError> {
    let credentials = LoginCredentials {
        email: args.email,
        password: args.password,
    };
    let errors = validate_login(&credentials);
    if !errors.is_empty() {
        return Err(AppError::Validation(field_error_summary(&errors)));
    }

    let store = file_session(config, portal_service(config));
    store.initialize();
    let user = store.login(&credentials).await?;

    println!("Signed in as {} <{}>", user.display_name(), user.email);
    println!(
        "Continue to {}",
        post_login_destination(args.from.as_deref())
    );
    Ok(())
}

pub(crate) async fn register(config: &AppConfig, args: RegisterArgs) -> Result<(), AppError> {
    let data = RegisterData {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
    };
    let errors = validate_registration(&data);
    if !errors.is_empty() {
        return Err(AppError::Validation(field_error_summary(&errors)));
    }

    let store = file_session(config, portal_service(config));
    store.initialize();
    let user = store.register(&data).await?;

    println!(
        "Registered {} <{}> with id {}",
        user.display_name(),
        user.email,
        user.id
    );
    Ok(())
}

pub(crate) fn logout(config: &AppConfig) -> Result<(), AppError> {
    let store = file_session(config, portal_service(config));
    let was_signed_in = store.initialize().is_authenticated;
    store.logout();

    if was_signed_in {
        println!("Signed out");
    } else {
        println!("No active session");
    }
    Ok(())
}

pub(crate) fn whoami(config: &AppConfig, args: WhoamiArgs) -> Result<(), AppError> {
    let store = file_session(config, portal_service(config));
    let state = store.initialize();
    debug!(session_file = %config.portal.session_file.display(), "loaded session");

    match &state.user {
        Some(user) if state.is_authenticated => {
            println!("{} <{}> (id {})", user.display_name(), user.email, user.id);
            println!("Member since {}", user.created_at);
        }
        _ => println!("Not signed in"),
    }

    if let Some(page) = args.page {
        match navigate(&state, &page) {
            GuardDecision::Render => println!("{page}: accessible"),
            GuardDecision::Loading => println!("{page}: session still loading"),
            GuardDecision::Redirect { to, .. } => println!("{page}: redirects to {to}"),
        }
    }
    Ok(())
}
