// SQLite-backed todo store

use crate::error::{Result, TodoError};
use crate::filter::ListFilter;
use crate::tags;
use crate::todo::Todo;
use chrono::{DateTime, Utc};
use rusqlite::types::ToSql;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        done BOOLEAN DEFAULT 0,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        completed_at DATETIME,
        tags TEXT DEFAULT '[]'
    );

    CREATE INDEX IF NOT EXISTS idx_todos_done ON todos(done);
"#;

/// Result of a mutation addressed by id
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

impl Outcome {
    fn from_affected(rows: usize) -> Self {
        if rows == 0 { Outcome::NotFound } else { Outcome::Applied }
    }

    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

/// Persistent todo table behind a single SQLite connection
pub struct TodoStore {
    path: Option<PathBuf>,
    db: Connection,
}

impl TodoStore {
    /// Open or create the database file at `path`, creating parent directories as needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let db = Connection::open(&path)?;
        debug!(path = %path.display(), "Opened todo database");

        let store = Self { path: Some(path), db };
        store.create_schema()?;
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as the value
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            path: None,
            db: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    /// Database file path, None for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn create_schema(&self) -> Result<()> {
        info!("Ensuring todo schema");
        self.db.execute_batch(SCHEMA)?;
        Ok(())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Parse `raw` into title and tags and insert it as a pending todo.
    /// Returns the new id.
    pub fn add(&mut self, raw: &str) -> Result<i64> {
        let (title, tags) = tags::extract(raw);
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        self.db.execute(
            "INSERT INTO todos (title, done, created_at, tags) VALUES (?1, 0, ?2, ?3)",
            params![title, now(), tags],
        )?;

        let id = self.db.last_insert_rowid();
        debug!(id, %title, tag_count = tags.len(), "add: inserted");
        Ok(id)
    }

    /// Replace title and tags, leaving completion state and timestamps alone
    pub fn edit(&mut self, id: i64, raw: &str) -> Result<Outcome> {
        let (title, tags) = tags::extract(raw);
        if title.is_empty() {
            return Err(TodoError::EmptyTitle);
        }

        let rows = self.db.execute(
            "UPDATE todos SET title = ?1, tags = ?2 WHERE id = ?3",
            params![title, tags, id],
        )?;

        debug!(id, rows, "edit: updated");
        Ok(Outcome::from_affected(rows))
    }

    /// Mark done and stamp `completed_at`. Completing twice re-stamps it.
    pub fn complete(&mut self, id: i64) -> Result<Outcome> {
        let rows = self.db.execute(
            "UPDATE todos SET done = 1, completed_at = ?1 WHERE id = ?2",
            params![now(), id],
        )?;

        debug!(id, rows, "complete: updated");
        Ok(Outcome::from_affected(rows))
    }

    pub fn delete(&mut self, id: i64) -> Result<Outcome> {
        let rows = self.db.execute("DELETE FROM todos WHERE id = ?1", [id])?;

        debug!(id, rows, "delete: removed");
        Ok(Outcome::from_affected(rows))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn get(&self, id: i64) -> Result<Option<Todo>> {
        let todo = self
            .db
            .query_row(
                &format!("SELECT {} FROM todos WHERE id = ?1", Todo::COLUMNS),
                [id],
                Todo::from_row,
            )
            .optional()?;
        Ok(todo)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.db.query_row("SELECT COUNT(*) FROM todos", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// List todos matching `filter`, oldest first
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Todo>> {
        let mut query = format!("SELECT {} FROM todos WHERE 1 = 1", Todo::COLUMNS);
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(done) = filter.status.done_value() {
            params.push(Box::new(done));
            query.push_str(&format!(" AND done = ?{}", params.len()));
        }

        // Exact membership against the JSON array in `tags`
        if let Some(tag) = &filter.tag {
            params.push(Box::new(tag.clone()));
            query.push_str(&format!(
                " AND EXISTS (SELECT 1 FROM json_each(todos.tags) WHERE json_each.value = ?{})",
                params.len()
            ));
        }

        query.push_str(" ORDER BY id ASC");
        debug!(%query, status = %filter.status, tag = ?filter.tag, "list: querying");

        let mut stmt = self.db.prepare(&query)?;
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(params_refs.as_slice(), Todo::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        debug!(count = results.len(), "list: done");
        Ok(results)
    }
}

fn now() -> DateTime<Utc> {
    Utc::now()
}
