//! SQL DDL for initializing the application database.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema:
/// - `users` rows are created at registration and never deleted here
/// - `items.user_id` scopes every item to exactly one owner
/// - `category_items` is the Item <-> Category join table; the UNIQUE
///   pair constraint makes repeated attachment idempotent together
///   with `INSERT OR IGNORE`
/// - deleting an item cascades its join rows (foreign keys are ON)
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    description TEXT NOT NULL,
    done INTEGER NOT NULL DEFAULT 0,
    user_id INTEGER NOT NULL REFERENCES users(id),
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_user_id ON items(user_id);

CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS category_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id INTEGER NOT NULL REFERENCES categories(id),
    item_id INTEGER NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    UNIQUE(category_id, item_id)
);
"#;
