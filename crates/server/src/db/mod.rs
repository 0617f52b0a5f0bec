//! Persistence boundary
//!
//! One SQLite pool per process, created at start-up and shared through
//! [`crate::core::AppState`]. Every query binds its values; SQL text is
//! never assembled from request data.

mod categories;
mod posts;
mod profiles;
mod users;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, SqlitePool};
use tracing::info;

use crate::core::error::Result;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL,
        password TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        phone TEXT NOT NULL,
        user_id INTEGER NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        content TEXT NOT NULL,
        published BOOLEAN NOT NULL DEFAULT 0,
        author_id INTEGER NOT NULL,
        created_at TEXT NOT NULL,
        FOREIGN KEY (author_id) REFERENCES users(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories_on_posts (
        post_id INTEGER NOT NULL,
        category_id INTEGER NOT NULL,
        assigned_at TEXT NOT NULL,
        assigned_by TEXT NOT NULL,
        PRIMARY KEY (post_id, category_id),
        FOREIGN KEY (post_id) REFERENCES posts(id),
        FOREIGN KEY (category_id) REFERENCES categories(id)
    )
    "#,
];

/// Positional parameter for [`Db::raw_query`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawParam {
    Int(i64),
    Text(String),
    Bool(bool),
}

/// Handle to the database. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Open (creating if missing) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        info!("[Db] Connected to {}", url);
        Ok(Self { pool })
    }

    /// Create the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Run a parameterised statement outside the typed helpers.
    ///
    /// `?` placeholders in `sql` are bound from `params` in order.
    pub async fn raw_query<T>(&self, sql: &str, params: &[RawParam]) -> Result<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let mut query = sqlx::query_as::<_, T>(sql);
        for param in params {
            query = match param {
                RawParam::Int(v) => query.bind(*v),
                RawParam::Text(v) => query.bind(v.clone()),
                RawParam::Bool(v) => query.bind(*v),
            };
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every connection; later queries fail with `PoolClosed`.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Db;
    use tempfile::TempDir;

    /// Fresh database in a temp dir. Keep the dir alive for the test.
    pub async fn temp_db() -> (TempDir, Db) {
        let dir = TempDir::new().unwrap();
        let url = pojok_common::sqlite_url(&dir.path().join("test.sqlite"));
        let db = Db::connect(&url, 2).await.unwrap();
        db.init_schema().await.unwrap();
        (dir, db)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::temp_db;
    use super::*;
    use crate::core::error::Error;
    use crate::models::User;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let (_dir, db) = temp_db().await;
        db.init_schema().await.unwrap();
        let users: Vec<User> = db.raw_query("SELECT * FROM users", &[]).await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn test_raw_query_binds_parameters() {
        let (_dir, db) = temp_db().await;
        sqlx::query("INSERT INTO users (username, password) VALUES ('a', 'x'), ('b', 'y')")
            .execute(db.pool())
            .await
            .unwrap();

        let hostile = "a' OR '1'='1";
        let users: Vec<User> = db
            .raw_query(
                "SELECT * FROM users WHERE username = ?",
                &[RawParam::Text(hostile.to_string())],
            )
            .await
            .unwrap();
        assert!(users.is_empty());

        let users: Vec<User> = db
            .raw_query("SELECT * FROM users WHERE id = ?", &[RawParam::Int(2)])
            .await
            .unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "b");
    }

    #[tokio::test]
    async fn test_closed_pool_errors() {
        let (_dir, db) = temp_db().await;
        db.close().await;
        assert!(db.is_closed());

        let result: Result<Vec<User>> = db.raw_query("SELECT * FROM users", &[]).await;
        assert!(matches!(result, Err(Error::Database(_))));
    }
}
