//! Item flow: listing, create, details, edit, category attachment and
//! deletion. Every handler requires a session via the `CurrentUser`
//! guard; the guard redirects unauthenticated requests to the login form.
//!
//! `category_id == 0` is the "no category selected" sentinel throughout
//! and suppresses join-row creation.

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::router::AppState;
use crate::views;
use axum::Form;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct ItemForm {
    pub description: String,
    /// HTML checkbox: present in the form body only when checked.
    #[serde(default)]
    pub done: Option<String>,
    #[serde(default)]
    pub category_id: i64,
}

impl ItemForm {
    fn done(&self) -> bool {
        self.done.is_some()
    }

    fn selected_category(&self) -> Option<i64> {
        (self.category_id != 0).then_some(self.category_id)
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoryChoice {
    #[serde(default)]
    pub category_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct JoinRef {
    pub join_id: i64,
}

/// GET /items — exactly the current user's items, storage order.
pub async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Response, AppError> {
    let Some(current) = state.storage.get_user_by_id(user.user_id).await? else {
        // Session cookie survived but the account is gone; start over.
        return Ok(Redirect::to("/account/login").into_response());
    };
    let items = state.storage.list_items_for_user(current.id).await?;
    Ok(Html(views::items_page(&current.email, &items)).into_response())
}

/// GET /items/create — form with every category as an option.
pub async fn create_form(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Html<String>, AppError> {
    let categories = state.storage.list_categories().await?;
    Ok(Html(views::item_create_page(&categories)))
}

/// POST /items/create
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<ItemForm>,
) -> Result<Redirect, AppError> {
    let item_id = state
        .storage
        .create_item(
            user.user_id,
            &form.description,
            form.done(),
            form.selected_category(),
        )
        .await?;
    info!(item_id, user_id = user.user_id, "item created");
    Ok(Redirect::to("/items"))
}

/// GET /items/details/{id} — item with categories resolved by name.
pub async fn details(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let details = state
        .storage
        .get_item_details(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Html(views::details_page(&details)))
}

/// GET /items/edit/{id}
pub async fn edit_form(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let item = state.storage.get_item(id).await?.ok_or(AppError::NotFound)?;
    let categories = state.storage.list_categories().await?;
    Ok(Html(views::item_edit_page(&item, &categories)))
}

/// POST /items/edit/{id}
///
/// Field-level update of description and done, plus one optional
/// deduplicated category attachment.
pub async fn edit(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(form): Form<ItemForm>,
) -> Result<Redirect, AppError> {
    let affected = state
        .storage
        .update_item(id, &form.description, form.done())
        .await?;
    if affected == 0 {
        debug!(item_id = id, "edit of absent item ignored");
        return Ok(Redirect::to("/items"));
    }
    if let Some(category_id) = form.selected_category() {
        state.storage.attach_category(id, category_id).await?;
    }
    Ok(Redirect::to("/items"))
}

/// GET /items/add-category/{id}
pub async fn add_category_form(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let item = state.storage.get_item(id).await?.ok_or(AppError::NotFound)?;
    let categories = state.storage.list_categories().await?;
    Ok(Html(views::add_category_page(&item, &categories)))
}

/// POST /items/add-category/{id} — persists only for a non-zero choice.
pub async fn add_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    Form(choice): Form<CategoryChoice>,
) -> Result<Redirect, AppError> {
    if choice.category_id != 0 {
        state.storage.attach_category(id, choice.category_id).await?;
    }
    Ok(Redirect::to("/items"))
}

/// GET /items/delete/{id} — confirmation view.
pub async fn delete_confirm(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let item = state.storage.get_item(id).await?.ok_or(AppError::NotFound)?;
    Ok(Html(views::delete_confirm_page(&item)))
}

/// POST /items/delete/{id} — join rows cascade; an absent id is a no-op.
pub async fn delete_confirmed(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    let affected = state.storage.delete_item(id).await?;
    if affected == 0 {
        debug!(item_id = id, "delete of absent item ignored");
    } else {
        info!(item_id = id, user_id = user.user_id, "item deleted");
    }
    Ok(Redirect::to("/items"))
}

/// POST /items/delete-category — removes one association by join id.
pub async fn delete_category(
    State(state): State<AppState>,
    _user: CurrentUser,
    Form(join): Form<JoinRef>,
) -> Result<Redirect, AppError> {
    let affected = state.storage.delete_category_item(join.join_id).await?;
    if affected == 0 {
        debug!(join_id = join.join_id, "delete of absent association ignored");
    }
    Ok(Redirect::to("/items"))
}
