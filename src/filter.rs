// Query filtering for todo listings

use crate::error::TodoError;
use std::str::FromStr;

/// Which todos a listing keeps, by completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    All,
    Done,
    #[default]
    Pending,
}

impl StatusFilter {
    /// Value the `done` column must equal, or None for no constraint
    pub(crate) fn done_value(self) -> Option<bool> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Done => Some(true),
            StatusFilter::Pending => Some(false),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = TodoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "all" => Ok(StatusFilter::All),
            "d" | "done" => Ok(StatusFilter::Done),
            "p" | "pending" => Ok(StatusFilter::Pending),
            _ => Err(TodoError::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Done => write!(f, "done"),
            StatusFilter::Pending => write!(f, "pending"),
        }
    }
}

/// Filter for listing todos
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub status: StatusFilter,
    /// Exact tag name (without `@`); None keeps every todo
    pub tag: Option<String>,
}

impl ListFilter {
    pub fn new(status: StatusFilter) -> Self {
        Self { status, tag: None }
    }

    /// Restrict to a tag. Empty input and a leading `@` are both tolerated.
    pub fn with_tag(mut self, tag: impl AsRef<str>) -> Self {
        let tag = tag.as_ref().trim();
        let tag = tag.strip_prefix(crate::tags::TAG_PREFIX).unwrap_or(tag);
        self.tag = if tag.is_empty() { None } else { Some(tag.to_string()) };
        self
    }
}
