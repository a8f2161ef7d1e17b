//! Category flow: labels have a lifecycle of their own, independent of
//! any item. Kept minimal — a listing with an inline create form.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::router::AppState;
use crate::views;
use axum::Form;
use axum::extract::State;
use axum::response::{Html, Redirect};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CategoryForm {
    pub name: String,
}

/// GET /categories
pub async fn index(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Html<String>, AppError> {
    let categories = state.storage.list_categories().await?;
    Ok(Html(views::categories_page(&categories)))
}

/// POST /categories/create — blank names are dropped silently.
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect, AppError> {
    let name = form.name.trim();
    if !name.is_empty() {
        let category_id = state.storage.create_category(name).await?;
        info!(category_id, "category created");
    }
    Ok(Redirect::to("/categories"))
}
