use crate::router::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use time::Duration;

const SESSION_COOKIE: &str = "todolist_session";

/// Persistent session: 30 days, matching the source's isPersistent sign-in.
const SESSION_MAX_AGE: Duration = Duration::days(30);

/// Store the authenticated user id in the encrypted session cookie.
pub fn establish(jar: PrivateCookieJar, user_id: i64, insecure_cookie: bool) -> PrivateCookieJar {
    jar.add(session_cookie(user_id, insecure_cookie))
}

/// Drop the session cookie. Safe to call without a prior session.
pub fn teardown(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie())
}

fn session_cookie(user_id: i64, insecure_cookie: bool) -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, user_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(!insecure_cookie)
        .max_age(SESSION_MAX_AGE)
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(SESSION_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Request-scoped authenticated-user context. Extracting it enforces the
/// session requirement: a request without a valid session cookie is
/// redirected to the login form before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub user_id: i64,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar = match PrivateCookieJar::from_request_parts(parts, state).await
        {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        let user_id = jar
            .get(SESSION_COOKIE)
            .and_then(|c| c.value().parse::<i64>().ok())
            .ok_or_else(|| Redirect::to("/account/login"))?;
        Ok(CurrentUser { user_id })
    }
}
