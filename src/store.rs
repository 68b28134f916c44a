// SQLite-backed note store

use crate::models::Task;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable CRUD over the `tasks` table in a single SQLite file.
///
/// All statements are prepared with positional parameters; rusqlite
/// finalizes them on every exit path, so no handle can leak.
pub struct Store {
    db_path: PathBuf,
    db: Connection,
}

impl Store {
    /// Open or create a store at the given file path.
    ///
    /// If the file is absent or empty the fixed schema is created first.
    /// An existing non-empty file is opened as-is, without an integrity
    /// check. Schema-creation failure is fatal to the caller.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();

        let needs_schema = match fs::metadata(&db_path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let db = Connection::open(&db_path)
            .with_context(|| format!("Failed to open SQLite database at {}", db_path.display()))?;

        let store = Self { db_path, db };

        if needs_schema {
            store.create_schema()?;
        }

        Ok(store)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating tasks schema");

        self.db
            .execute_batch(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY,
                    content TEXT NOT NULL,
                    created_at INTEGER NOT NULL
                );",
            )
            .context("Failed to create tasks table")?;

        Ok(())
    }

    /// Insert a new task, returning its engine-assigned id.
    ///
    /// Callers must reject blank content before reaching the store.
    pub fn insert(&mut self, content: &str) -> Result<i64> {
        self.db
            .execute(
                "INSERT INTO tasks (content, created_at) VALUES (?1, ?2)",
                rusqlite::params![content, now_secs()],
            )
            .context("Failed to insert task")?;

        Ok(self.db.last_insert_rowid())
    }

    /// Replace the content of the task with the given id.
    ///
    /// Returns `Ok(false)` when no such row exists; `created_at` is left
    /// untouched either way.
    pub fn update(&mut self, id: i64, content: &str) -> Result<bool> {
        let changed = self
            .db
            .execute(
                "UPDATE tasks SET content = ?1 WHERE id = ?2",
                rusqlite::params![content, id],
            )
            .context("Failed to update task")?;

        Ok(changed > 0)
    }

    /// Remove the task with the given id permanently.
    ///
    /// Returns `Ok(false)` when no such row exists.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let changed = self
            .db
            .execute("DELETE FROM tasks WHERE id = ?1", rusqlite::params![id])
            .context("Failed to delete task")?;

        Ok(changed > 0)
    }

    /// Whether a task with the given id exists.
    pub fn exists(&self, id: i64) -> Result<bool> {
        let found: bool = self.db.query_row(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
            rusqlite::params![id],
            |row| row.get(0),
        )?;

        Ok(found)
    }

    /// Fetch a single task by id, `None` when not found.
    pub fn get(&self, id: i64) -> Result<Option<Task>> {
        let mut stmt = self
            .db
            .prepare("SELECT id, content, created_at FROM tasks WHERE id = ?1")?;

        let task = stmt
            .query_row(rusqlite::params![id], |row| {
                Ok(Task {
                    id: row.get(0)?,
                    content: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()?;

        Ok(task)
    }

    /// Fetch every task, ordered by id ascending.
    pub fn list(&self) -> Result<Vec<Task>> {
        let mut stmt = self
            .db
            .prepare("SELECT id, content, created_at FROM tasks ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Task {
                id: row.get(0)?,
                content: row.get(1)?,
                created_at: row.get(2)?,
            })
        })?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }

        Ok(tasks)
    }

    /// Number of stored tasks.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))
            .context("Failed to count tasks")?;

        Ok(count)
    }
}

/// Current time in whole seconds since the Unix epoch.
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
