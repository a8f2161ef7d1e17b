use crate::auth::identity::IdentityGateway;
use crate::db::TodoStorage;
use crate::handlers::{account, categories, items};
use axum::Router;
use axum::extract::FromRef;
use axum::routing::{get, post};
use axum_extra::extract::cookie::Key;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub storage: TodoStorage,
    pub identity: IdentityGateway,
    pub insecure_cookie: bool,
    key: Key,
}

impl AppState {
    pub fn new(storage: TodoStorage, cookie_secret: Option<&str>, insecure_cookie: bool) -> Self {
        let key = match cookie_secret {
            Some(secret) if secret.len() >= 32 => Key::derive_from(secret.as_bytes()),
            Some(_) => {
                warn!("cookie secret shorter than 32 bytes, generating a volatile key");
                Key::generate()
            }
            None => {
                warn!("no cookie secret configured; sessions will not survive a restart");
                Key::generate()
            }
        };
        let identity = IdentityGateway::new(storage.clone());
        Self {
            storage,
            identity,
            insecure_cookie,
            key,
        }
    }
}

// Wiring for the private cookie jar extractor.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Key {
        state.key.clone()
    }
}

pub fn todolist_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(account::index))
        .route("/account", get(account::index))
        .route(
            "/account/register",
            get(account::register_form).post(account::register),
        )
        .route(
            "/account/login",
            get(account::login_form).post(account::login),
        )
        .route("/account/logoff", post(account::logoff))
        .route("/items", get(items::index))
        .route("/items/create", get(items::create_form).post(items::create))
        .route("/items/details/{id}", get(items::details))
        .route("/items/edit/{id}", get(items::edit_form).post(items::edit))
        .route(
            "/items/add-category/{id}",
            get(items::add_category_form).post(items::add_category),
        )
        .route(
            "/items/delete/{id}",
            get(items::delete_confirm).post(items::delete_confirmed),
        )
        .route("/items/delete-category", post(items::delete_category))
        .route("/categories", get(categories::index))
        .route("/categories/create", post(categories::create))
        .with_state(state)
}
