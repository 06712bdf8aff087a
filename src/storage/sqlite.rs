//! SQLite-backed feedback store.
//!
//! One connection guarded by a mutex. Every call runs on the blocking pool,
//! so writes are serialized and the async executor never waits on disk.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;

use crate::config::StorageConfig;
use crate::storage::error::StorageError;
use crate::storage::types::{Feedback, NewFeedback};

const CREATE_TABLE: &str = "
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL,
    rating INTEGER NOT NULL CHECK(rating >= 1 AND rating <= 5),
    message TEXT NOT NULL,
    agent TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)";

/// Handle to the feedback table. Cheap to clone.
#[derive(Clone)]
pub struct FeedbackStore {
    conn: Arc<Mutex<Connection>>,
}

impl FeedbackStore {
    /// Open (or create) the database described by `config` and ensure the schema exists.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let conn = if config.path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            let path = Path::new(&config.path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Connection::open(path)?
        };
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        tracing::info!(path = %config.path, journal_mode = %mode, "Feedback store opened");

        Self::init(conn)
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(CREATE_TABLE)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Insert a row and return it with its assigned id and timestamp.
    ///
    /// Out-of-range ratings are refused by the table's CHECK constraint.
    pub async fn insert(&self, new: NewFeedback) -> Result<Feedback, StorageError> {
        self.with_conn(move |conn| {
            let (id, created_at) = conn.query_row(
                "INSERT INTO feedback (email, rating, message, agent) VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, created_at",
                params![new.email, new.rating, new.message, new.agent],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )?;

            Ok(Feedback {
                id,
                email: new.email,
                rating: new.rating,
                message: new.message,
                agent: new.agent,
                created_at,
            })
        })
        .await
    }

    /// All rows in id order.
    pub async fn list(&self) -> Result<Vec<Feedback>, StorageError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, rating, message, agent, created_at FROM feedback ORDER BY id",
            )?;
            let rows = stmt.query_map([], feedback_from_row)?;
            rows.collect()
        })
        .await
    }

    /// Look up a single row.
    pub async fn get(&self, id: i64) -> Result<Option<Feedback>, StorageError> {
        self.with_conn(move |conn| {
            conn.query_row(
                "SELECT id, email, rating, message, agent, created_at FROM feedback WHERE id = ?1",
                params![id],
                feedback_from_row,
            )
            .optional()
        })
        .await
    }

    #[cfg(test)]
    async fn count(&self) -> Result<u64, StorageError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM feedback", [], |row| row.get::<_, i64>(0))
                .map(|n| n as u64)
        })
        .await
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StorageError::Poisoned)?;
            f(&guard).map_err(StorageError::from)
        })
        .await?
    }
}

fn feedback_from_row(row: &Row<'_>) -> rusqlite::Result<Feedback> {
    Ok(Feedback {
        id: row.get(0)?,
        email: row.get(1)?,
        rating: row.get(2)?,
        message: row.get(3)?,
        agent: row.get(4)?,
        created_at: row.get(5)?,
    })
}
