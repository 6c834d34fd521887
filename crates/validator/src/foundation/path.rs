//! Field path construction.
//!
//! Paths compose depth-first: `parent.child` for nested objects and
//! `field[index]` for collection elements, so four levels of nesting read
//! `a[0].b[1].c[2].d`.

use std::fmt;

/// The address of a value inside the payload being validated.
///
/// The root path is empty; every nested step produces a new path, leaving
/// the parent untouched so sibling tasks can branch from the same prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    /// The empty path of the top-level value.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Appends a named child segment (`parent.name`).
    #[must_use]
    pub fn field(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            let mut path = String::with_capacity(self.0.len() + name.len() + 1);
            path.push_str(&self.0);
            path.push('.');
            path.push_str(name);
            Self(path)
        }
    }

    /// Appends a collection index segment (`parent[index]`).
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    /// Returns true for the top-level path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the rendered path.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path, returning the rendered string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_field_has_no_leading_dot() {
        assert_eq!(FieldPath::root().field("email").as_str(), "email");
    }

    #[test]
    fn segments_compose_depth_first() {
        let path = FieldPath::root()
            .field("a")
            .index(0)
            .field("b")
            .index(1)
            .field("c")
            .index(2)
            .field("d");
        assert_eq!(path.to_string(), "a[0].b[1].c[2].d");
    }

    #[test]
    fn branching_leaves_parent_untouched() {
        let parent = FieldPath::root().field("user");
        let email = parent.field("email");
        let name = parent.field("name");
        assert_eq!(parent.as_str(), "user");
        assert_eq!(email.as_str(), "user.email");
        assert_eq!(name.as_str(), "user.name");
    }
}
