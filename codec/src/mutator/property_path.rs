//! Dotted property paths such as `Items.3.Name`

use std::fmt::Display;

use error_stack::Report;
use itertools::Itertools;

use crate::constants::PATH_SEPARATOR;
use crate::error::{MutationError, MutationResult};

/// A non-empty sequence of path segments
///
/// A segment is only interpreted (field name or container index) once the kind of
/// the value it is applied to is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    segments: Vec<String>,
}

impl PropertyPath {
    /// Split `path` on `.`
    pub fn parse(path: &str) -> MutationResult<Self> {
        if path.trim().is_empty() {
            return Err(Report::new(MutationError::PathExhausted {
                path: path.to_string(),
                kind: "empty path".to_string(),
            }));
        }
        Self::from_segments(path.split(PATH_SEPARATOR))
    }

    /// Build a path from already separated segments
    pub fn from_segments<I, S>(segments: I) -> MutationResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<String> = segments
            .into_iter()
            .map(|segment| segment.as_ref().trim().to_string())
            .collect();
        if segments.is_empty() {
            return Err(Report::new(MutationError::PathExhausted {
                path: String::new(),
                kind: "empty path".to_string(),
            }));
        }
        if let Some(empty) = segments.iter().find(|segment| segment.is_empty()) {
            return Err(Report::new(MutationError::IndexInvalid {
                segment: empty.clone(),
            })
            .attach(format!("Path: {}", segments.join("."))));
        }
        Ok(Self { segments })
    }

    /// The segments in order
    #[must_use]
    pub fn segments(&self) -> &[String] { &self.segments }

    /// Segment at `index`
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&str> { self.segments.get(index).map(String::as_str) }

    /// Number of segments
    #[must_use]
    pub const fn len(&self) -> usize { self.segments.len() }

    /// Whether there are no segments; never true for a constructed path
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.segments.is_empty() }

    /// The first `count` segments joined back into path text
    #[must_use]
    pub fn prefix(&self, count: usize) -> String {
        self.segments
            .iter()
            .take(count)
            .join(&PATH_SEPARATOR.to_string())
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix(self.segments.len()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_dots() {
        let path = PropertyPath::parse("Items.3.Name").unwrap();
        assert_eq!(path.segments(), ["Items", "3", "Name"]);
        assert_eq!(path.prefix(2), "Items.3");
        assert_eq!(path.to_string(), "Items.3.Name");
    }

    #[test]
    fn test_empty_path_is_exhausted() {
        let error = PropertyPath::parse("  ").unwrap_err();
        assert!(matches!(error.current_context(), MutationError::PathExhausted { .. }));
    }

    #[test]
    fn test_empty_segment_is_invalid() {
        let error = PropertyPath::parse("Items..Name").unwrap_err();
        assert_eq!(
            error.current_context(),
            &MutationError::IndexInvalid {
                segment: String::new(),
            }
        );
    }
}
