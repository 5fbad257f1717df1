// The todo record and its SQLite row mapping

use crate::tags::TagSet;
use chrono::{DateTime, Utc};
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// A single task entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub done: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub tags: TagSet,
}

impl Todo {
    /// Columns selected by every read query, in `from_row` order
    pub(crate) const COLUMNS: &'static str = "id, title, done, created_at, completed_at, tags";

    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            done: row.get(2)?,
            created_at: row.get(3)?,
            completed_at: row.get(4)?,
            tags: row.get(5)?,
        })
    }
}

impl ToSql for TagSet {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let json = self
            .to_json()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(ToSqlOutput::from(json))
    }
}

impl FromSql for TagSet {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(TagSet::new()),
            other => {
                let json = other.as_str()?;
                TagSet::from_json(json).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    }
}
