// Runtime configuration: database location and environment variable names

use crate::error::{Result, TodoError};
use std::path::{Path, PathBuf};

/// Overrides the database file location
pub const ENV_DB_PATH: &str = "TODO_PATH";

/// Default tag filter when `--tag` is not given
pub const ENV_TAG: &str = "TODO_TAG";

/// Tracing filter directives for diagnostics on stderr
pub const ENV_LOG: &str = "TODO_LOG";

/// Database file, relative to the home directory
pub const DEFAULT_DB_FILE: &str = ".config/.todo.db";

/// Default database path under `home`
pub fn default_db_path_in(home: &Path) -> PathBuf {
    home.join(DEFAULT_DB_FILE)
}

/// Resolve the database path: an explicit override wins, otherwise `~/.config/.todo.db`
pub fn resolve_db_path(override_path: Option<&Path>) -> Result<PathBuf> {
    match override_path {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.to_path_buf()),
        _ => {
            let home = dirs::home_dir().ok_or(TodoError::NoHomeDir)?;
            Ok(default_db_path_in(&home))
        }
    }
}
