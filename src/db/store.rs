use crate::db::models::{AttachedCategory, Category, CategoryItem, Item, ItemDetails, User};
use crate::db::schema::SQLITE_INIT;
use crate::error::AppError;
use chrono::Utc;
use sqlx::{Pool, Sqlite};

pub type SqlitePool = Pool<Sqlite>;

/// Persistence gateway over users, items, categories and their join rows.
#[derive(Clone)]
pub struct TodoStorage {
    pool: SqlitePool,
}

impl TodoStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), AppError> {
        // execute statements one by one (sqlx::query rejects multi-commands)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ----- users -----

    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let created_at = Utc::now();
        let res = sqlx::query(
            "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(created_at)
        .execute(&self.pool)
        .await?;
        Ok(User {
            id: res.last_insert_rowid(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            created_at,
        })
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    // ----- items -----

    /// All items owned by `user_id`, in storage order.
    pub async fn list_items_for_user(&self, user_id: i64) -> Result<Vec<Item>, AppError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, description, done, user_id, created_at FROM items WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    /// Insert an item and, when `category_id` is given, one join row,
    /// inside a single transaction. Returns the new item id.
    pub async fn create_item(
        &self,
        user_id: i64,
        description: &str,
        done: bool,
        category_id: Option<i64>,
    ) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        let res = sqlx::query(
            "INSERT INTO items (description, done, user_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(description)
        .bind(done)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        let item_id = res.last_insert_rowid();

        if let Some(category_id) = category_id {
            sqlx::query(
                "INSERT OR IGNORE INTO category_items (category_id, item_id) VALUES (?, ?)",
            )
            .bind(category_id)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(item_id)
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<Item>, AppError> {
        let item = sqlx::query_as::<_, Item>(
            "SELECT id, description, done, user_id, created_at FROM items WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    /// An item together with its categories resolved through the join
    /// table, or `None` when the id matches nothing.
    pub async fn get_item_details(&self, id: i64) -> Result<Option<ItemDetails>, AppError> {
        let Some(item) = self.get_item(id).await? else {
            return Ok(None);
        };
        let categories = sqlx::query_as::<_, AttachedCategory>(
            r#"SELECT ci.id AS join_id, c.id AS category_id, c.name
               FROM category_items ci
               JOIN categories c ON c.id = ci.category_id
               WHERE ci.item_id = ?
               ORDER BY ci.id"#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some(ItemDetails { item, categories }))
    }

    /// Field-level update of the mutable item columns. Returns the
    /// number of affected rows (0 when the id matches nothing).
    pub async fn update_item(
        &self,
        id: i64,
        description: &str,
        done: bool,
    ) -> Result<u64, AppError> {
        let res = sqlx::query("UPDATE items SET description = ?, done = ? WHERE id = ?")
            .bind(description)
            .bind(done)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    pub async fn delete_item(&self, id: i64) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    // ----- categories and join rows -----

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn create_category(&self, name: &str) -> Result<i64, AppError> {
        let res = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.last_insert_rowid())
    }

    /// Attach a category to an item. Idempotent: the UNIQUE pair
    /// constraint plus OR IGNORE drops duplicate attachments.
    pub async fn attach_category(&self, item_id: i64, category_id: i64) -> Result<(), AppError> {
        sqlx::query("INSERT OR IGNORE INTO category_items (category_id, item_id) VALUES (?, ?)")
            .bind(category_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn get_category_item(&self, join_id: i64) -> Result<Option<CategoryItem>, AppError> {
        let join = sqlx::query_as::<_, CategoryItem>(
            "SELECT id, category_id, item_id FROM category_items WHERE id = ?",
        )
        .bind(join_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(join)
    }

    pub async fn delete_category_item(&self, join_id: i64) -> Result<u64, AppError> {
        let res = sqlx::query("DELETE FROM category_items WHERE id = ?")
            .bind(join_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
