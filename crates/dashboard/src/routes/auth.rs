//! Authentication route handlers.
//!
//! Signup, login and logout. Failures redirect back with a short error code
//! in the query string; the page handlers map codes to messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::middleware::{clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub error: Option<String>,
}

/// Map an error code from the query string to a user-facing message.
fn error_message(code: &str) -> String {
    match code {
        "credentials" => "Invalid email or password.".to_owned(),
        "password_mismatch" => "The passwords don't match.".to_owned(),
        "weak_password" => "Password must be at least 8 characters.".to_owned(),
        "bad_username" => {
            "Usernames are 3-30 lowercase letters, digits and hyphens.".to_owned()
        }
        "bad_email" => "That email address doesn't look right.".to_owned(),
        "taken" => "That username or email is already registered.".to_owned(),
        "session" => "Could not start a session, please try again.".to_owned(),
        "failed" => "Something went wrong, please try again.".to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Login
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        success: query.success,
    }
}

/// Handle login form submission.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth = AuthService::new(state.pool());
    match auth.login(&form.email, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
            };
            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            Redirect::to("/auth/login?error=credentials").into_response()
        }
    }
}

// =============================================================================
// Signup
// =============================================================================

/// Display the signup page.
pub async fn signup_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    SignupTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle signup form submission.
///
/// Creates the account (user + password + default settings in one
/// transaction) and logs the new user straight in.
#[instrument(skip(state, session, form))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/signup?error=password_mismatch").into_response();
    }

    let auth = AuthService::new(state.pool());
    match auth.signup(&form.username, &form.email, &form.password).await {
        Ok(user) => {
            let current_user = CurrentUser {
                id: user.id,
                username: user.username,
            };
            if let Err(e) = set_current_user(&session, &current_user).await {
                tracing::error!("Failed to set session after signup: {}", e);
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(e) => {
            tracing::warn!("Signup failed: {}", e);
            let code = match e {
                AuthError::WeakPassword(_) => "weak_password",
                AuthError::InvalidUsername(_) => "bad_username",
                AuthError::InvalidEmail(_) => "bad_email",
                AuthError::UserAlreadyExists => "taken",
                _ => "failed",
            };
            Redirect::to(&format!("/auth/signup?error={code}")).into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout: clear the user and destroy the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}
