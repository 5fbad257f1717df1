// Tag parsing and the tag set stored with each todo

use serde::{Deserialize, Serialize};
use std::fmt;

/// Marker that turns a word into a tag
pub const TAG_PREFIX: char = '@';

/// Ordered set of tag names.
///
/// Keeps first-appearance order and drops exact duplicates. Serialized as a
/// plain JSON array, which is also how the `tags` column stores it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag; returns false if it was already present
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join tag names (without the `@` marker) with `sep`
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: Vec<String> = serde_json::from_str(json)?;
        Ok(raw.into_iter().collect())
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}{}", TAG_PREFIX, tag)?;
        }
        Ok(())
    }
}

/// Split raw input into a title and its tags.
///
/// Any whitespace-separated token starting with `@` and longer than the
/// marker itself becomes a tag. Everything else, a lone `@` included, is
/// rejoined with single spaces as the title.
pub fn extract(raw: &str) -> (String, TagSet) {
    let mut words = Vec::new();
    let mut tags = TagSet::new();

    for token in raw.split_whitespace() {
        match token.strip_prefix(TAG_PREFIX) {
            Some(tag) if !tag.is_empty() => {
                tags.insert(tag);
            }
            _ => words.push(token),
        }
    }

    (words.join(" "), tags)
}
