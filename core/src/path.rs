//! Declaration-position paths.
//!
//! A `TreePath` names an aggregate or member by the chain of element names
//! from the top of the declaration down to it, e.g. `Order/Lines/Amount`.

use std::fmt;

/// Separator used when rendering and parsing paths.
pub const PATH_SEPARATOR: char = '/';

/// Path of element names from the top-level declaration to an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreePath {
    segments: Vec<String>,
}

impl TreePath {
    /// Create a single-segment (top-level) path.
    pub fn top(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    /// Create a path from segments. Returns None if empty or any segment is blank.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(|s| s.trim().is_empty()) {
            return None;
        }
        Some(Self { segments })
    }

    /// Parse a `/`-separated path. Surrounding whitespace of segments is trimmed.
    pub fn parse(text: &str) -> Option<Self> {
        Self::from_segments(text.split(PATH_SEPARATOR).map(|s| s.trim().to_string()))
    }

    /// Path of a direct child element.
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.into());
        Self { segments }
    }

    /// Path of the enclosing element, or None for a top-level path.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Last segment.
    pub fn base_name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_top_level(&self) -> bool {
        self.segments.len() == 1
    }

    /// True if `self` equals `other` or lies below it.
    pub fn starts_with(&self, other: &TreePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", PATH_SEPARATOR)?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}
