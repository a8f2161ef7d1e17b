//! Account flow: registration, login, logoff.
//!
//! Identity failures deliberately carry no field-level detail back to
//! the form; the gateway logs the reason and the form re-renders with a
//! generic notice.

use crate::auth::identity::RegisterOutcome;
use crate::auth::session;
use crate::error::AppError;
use crate::router::AppState;
use crate::views;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// GET /account
pub async fn index() -> Html<String> {
    Html(views::landing_page())
}

/// GET /account/register
pub async fn register_form() -> Html<String> {
    Html(views::register_page(None))
}

/// POST /account/register
///
/// On success the new user is signed in right away and redirected to
/// the item listing.
pub async fn register(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    match state.identity.register(&creds.email, &creds.password).await? {
        RegisterOutcome::Created(user) => {
            let jar = session::establish(jar, user.id, state.insecure_cookie);
            Ok((jar, Redirect::to("/items")).into_response())
        }
        RegisterOutcome::Rejected => Ok(Html(views::register_page(Some(
            "Could not register with those details.",
        )))
        .into_response()),
    }
}

/// GET /account/login
pub async fn login_form() -> Html<String> {
    Html(views::login_page(None))
}

/// POST /account/login
///
/// Persistent session on success, no lockout on repeated failures.
pub async fn login(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    Form(creds): Form<Credentials>,
) -> Result<Response, AppError> {
    match state.identity.verify(&creds.email, &creds.password).await? {
        Some(user) => {
            info!(user_id = user.id, "login succeeded");
            let jar = session::establish(jar, user.id, state.insecure_cookie);
            Ok((jar, Redirect::to("/items")).into_response())
        }
        None => {
            info!("login failed");
            Ok(Html(views::login_page(Some("Invalid email or password."))).into_response())
        }
    }
}

/// POST /account/logoff
///
/// Always redirects to the item listing, with or without a prior session.
pub async fn logoff(jar: PrivateCookieJar) -> impl IntoResponse {
    (session::teardown(jar), Redirect::to("/items"))
}
