//! SQLite persistence for todos.
//!
//! # Design
//! `TodoStore` is a cheap-to-clone handle around a connection pool, built
//! once at startup and handed to every handler through router state.
//! Reads check a connection out for the duration of the call; every write
//! runs inside a transaction that is committed only on success. Dropping an
//! uncommitted transaction rolls it back, so any early `?` return leaves the
//! table untouched.
//!
//! Write transactions open with `BEGIN IMMEDIATE`. A deferred transaction
//! that reads and then writes has to upgrade its lock, and SQLite fails that
//! upgrade with `SQLITE_BUSY` instead of waiting. Taking the write lock up
//! front makes concurrent writers queue on the busy timeout.

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Transaction;
use thiserror::Error;

use crate::model::Todo;
use crate::schemas::{CreateTodo, UpdateTodo};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS todos (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT    NOT NULL CHECK (length(title) >= 1),
    description TEXT,
    completed   BOOLEAN NOT NULL DEFAULT 0,
    created_at  TEXT    NOT NULL,
    updated_at  TEXT    NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_todos_completed ON todos (completed);
CREATE INDEX IF NOT EXISTS idx_todos_created_at ON todos (created_at);
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sql(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct TodoStore {
    pool: SqlitePool,
}

impl TodoStore {
    /// Open (creating if missing) the database at `url` and ensure the schema.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// A private in-memory database. The pool holds exactly one connection
    /// that is never recycled, since closing it would discard the data.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn begin_write(&self) -> Result<Transaction<'static, Sqlite>, StoreError> {
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// All todos, newest first, optionally restricted to one completion state.
    ///
    /// `id` breaks ties between identical timestamps so repeated reads agree.
    pub async fn list(&self, completed: Option<bool>) -> Result<Vec<Todo>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let todos = match completed {
            Some(completed) => {
                sqlx::query_as::<_, Todo>(
                    "SELECT id, title, description, completed, created_at, updated_at \
                     FROM todos WHERE completed = ?1 ORDER BY created_at DESC, id DESC",
                )
                .bind(completed)
                .fetch_all(&mut *conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, Todo>(
                    "SELECT id, title, description, completed, created_at, updated_at \
                     FROM todos ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(&mut *conn)
                .await?
            }
        };
        Ok(todos)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, created_at, updated_at \
             FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(todo)
    }

    /// Insert a new, incomplete todo. Both timestamps get the same instant.
    pub async fn create(&self, input: CreateTodo) -> Result<Todo, StoreError> {
        let now = Utc::now();
        let mut tx = self.begin_write().await?;
        let todo = sqlx::query_as::<_, Todo>(
            "INSERT INTO todos (title, description, completed, created_at, updated_at) \
             VALUES (?1, ?2, 0, ?3, ?3) \
             RETURNING id, title, description, completed, created_at, updated_at",
        )
        .bind(input.title)
        .bind(input.description)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(todo)
    }

    /// Merge `update` into the stored row. `Ok(None)` means no such id and
    /// nothing was written.
    pub async fn update(&self, id: i64, update: UpdateTodo) -> Result<Option<Todo>, StoreError> {
        let mut tx = self.begin_write().await?;
        let existing = sqlx::query_as::<_, Todo>(
            "SELECT id, title, description, completed, created_at, updated_at \
             FROM todos WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let merged = existing.merge(update, Utc::now());
        sqlx::query(
            "UPDATE todos SET title = ?1, description = ?2, completed = ?3, updated_at = ?4 \
             WHERE id = ?5",
        )
        .bind(&merged.title)
        .bind(&merged.description)
        .bind(merged.completed)
        .bind(merged.updated_at)
        .bind(merged.id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(Some(merged))
    }

    /// Remove one row. Returns `false` without writing when the id is unknown.
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.begin_write().await?;
        let found = sqlx::query_scalar::<_, i64>("SELECT id FROM todos WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if found.is_none() {
            return Ok(false);
        }
        sqlx::query("DELETE FROM todos WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Remove every completed todo and return how many rows went.
    pub async fn delete_completed(&self) -> Result<u64, StoreError> {
        let mut tx = self.begin_write().await?;
        let deleted = sqlx::query("DELETE FROM todos WHERE completed = 1")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(deleted)
    }

    /// Empty the table. The count is the number of rows it held.
    pub async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut tx = self.begin_write().await?;
        let deleted = sqlx::query("DELETE FROM todos")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(deleted)
    }

    /// Insert the sample todos when the table is empty. Returns how many
    /// rows were added.
    pub async fn seed(&self) -> Result<u64, StoreError> {
        const SAMPLES: [(&str, &str, bool); 4] = [
            ("Learn the web framework", "Work through the official guide and build a small service", false),
            ("Write project documentation", "Cover the architecture and the HTTP API", true),
            ("Review the code", "Go over the todo backend for quality issues", false),
            ("Deploy to production", "Ship the service to a server and smoke test it", false),
        ];

        let mut tx = self.begin_write().await?;
        let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM todos")
            .fetch_one(&mut *tx)
            .await?;
        if existing > 0 {
            return Ok(0);
        }

        let now = Utc::now();
        for (title, description, completed) in SAMPLES {
            sqlx::query(
                "INSERT INTO todos (title, description, completed, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?4)",
            )
            .bind(title)
            .bind(description)
            .bind(completed)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(SAMPLES.len() as u64)
    }
}
