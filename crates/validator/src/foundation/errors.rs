//! The aggregated, path-addressed error report.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Mapping from field path to the ordered list of messages for that path.
///
/// Insertion order is preserved: paths appear in the declaration order of
/// the fields that produced them and messages in rule declaration order.
/// Serializes as a plain JSON object, e.g.
/// `{"email": ["invalid email format"], "items[0].sku": ["is required"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    entries: IndexMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Appends one message at `path`.
    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.entries
            .entry(path.into())
            .or_default()
            .push(message.into());
    }

    /// Appends several messages at `path`, keeping their order.
    ///
    /// An empty `messages` list leaves the report unchanged.
    pub fn extend_path(&mut self, path: impl Into<String>, messages: Vec<String>) {
        if messages.is_empty() {
            return;
        }
        self.entries.entry(path.into()).or_default().extend(messages);
    }

    /// Moves every entry of `other` to the end of this report.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (path, messages) in other.entries {
            self.extend_path(path, messages);
        }
    }

    /// Messages recorded for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.entries.get(path).map(Vec::as_slice)
    }

    /// Returns true if `path` has at least one message.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterates over the failing paths in report order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over `(path, messages)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(path, messages)| (path.as_str(), messages.as_slice()))
    }

    /// Number of failing paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total number of messages across all paths.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the report, returning the ordered map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.entries
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, Vec<String>);
    type IntoIter = indexmap::map::IntoIter<String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (path, message) in iter {
            errors.push(path, message);
        }
        errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (path, messages)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{path}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}
