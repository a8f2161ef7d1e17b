use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub description: String,
    pub done: bool,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryItem {
    pub id: i64,
    pub category_id: i64,
    pub item_id: i64,
}

/// One attached category as seen from an item's details view: the join
/// row id (needed to detach) plus the resolved category.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AttachedCategory {
    pub join_id: i64,
    pub category_id: i64,
    pub name: String,
}

/// An item with its categories resolved through the join table.
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetails {
    pub item: Item,
    pub categories: Vec<AttachedCategory>,
}
