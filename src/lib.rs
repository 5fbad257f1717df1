// todo - personal task tracking backed by SQLite

pub mod command;
pub mod config;
pub mod error;
pub mod filter;
pub mod render;
pub mod store;
pub mod tags;
pub mod todo;

// Re-export main types for convenience
pub use command::{Command, CommandFlags, Report};
pub use error::{Result, TodoError};
pub use filter::{ListFilter, StatusFilter};
pub use render::{DisplayConfig, OutputFormat, render, render_at};
pub use store::{Outcome, TodoStore};
pub use tags::{TagSet, extract};
pub use todo::Todo;
