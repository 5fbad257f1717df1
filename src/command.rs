// Resolving command-line input into a single store mutation

use crate::error::{Result, TodoError};
use crate::store::{Outcome, TodoStore};
use crate::tags;
use std::fmt;

/// Mutation flags as given on the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandFlags {
    pub edit: bool,
    pub complete: bool,
    pub delete: bool,
}

/// At most one mutation per invocation; every invocation lists afterwards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Edit(i64, String),
    Complete(i64),
    Delete(i64),
    List,
}

impl Command {
    /// Pick the command from flags and positional words.
    ///
    /// Precedence is edit, complete, delete, then add when words remain.
    pub fn resolve(flags: CommandFlags, args: &[String]) -> Result<Self> {
        if flags.edit {
            let id = parse_index(args)?;
            let text = args[1..].join(" ");
            if text.trim().is_empty() {
                return Err(TodoError::MissingText);
            }
            ensure_title(&text)?;
            return Ok(Command::Edit(id, text));
        }
        if flags.complete {
            return Ok(Command::Complete(parse_index(args)?));
        }
        if flags.delete {
            return Ok(Command::Delete(parse_index(args)?));
        }
        if !args.is_empty() {
            let text = args.join(" ");
            ensure_title(&text)?;
            return Ok(Command::Add(text));
        }
        Ok(Command::List)
    }

    pub fn execute(&self, store: &mut TodoStore) -> Result<Report> {
        let report = match self {
            Command::Add(text) => Report::Added(store.add(text)?),
            Command::Edit(id, text) => Report::from_outcome(store.edit(*id, text)?, *id, Report::Updated),
            Command::Complete(id) => Report::from_outcome(store.complete(*id)?, *id, Report::Completed),
            Command::Delete(id) => Report::from_outcome(store.delete(*id)?, *id, Report::Deleted),
            Command::List => Report::Nothing,
        };
        Ok(report)
    }
}

/// What a command did, for the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Added(i64),
    Updated(i64),
    Completed(i64),
    Deleted(i64),
    NotFound(i64),
    Nothing,
}

impl Report {
    fn from_outcome(outcome: Outcome, id: i64, applied: fn(i64) -> Report) -> Self {
        match outcome {
            Outcome::Applied => applied(id),
            Outcome::NotFound => Report::NotFound(id),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Report::NotFound(_))
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Added(id) => write!(f, "Added todo {}", id),
            Report::Updated(id) => write!(f, "Updated todo {}", id),
            Report::Completed(id) => write!(f, "Completed todo {}", id),
            Report::Deleted(id) => write!(f, "Deleted todo {}", id),
            Report::NotFound(id) => write!(f, "Todo with ID {} not found", id),
            Report::Nothing => Ok(()),
        }
    }
}

/// Reject text that is nothing but tags
fn ensure_title(text: &str) -> Result<()> {
    if tags::extract(text).0.is_empty() {
        return Err(TodoError::EmptyTitle);
    }
    Ok(())
}

/// First positional word as a todo id
fn parse_index(args: &[String]) -> Result<i64> {
    let raw = args.first().ok_or(TodoError::MissingIndex)?;
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TodoError::InvalidIndex(raw.clone())),
    }
}
