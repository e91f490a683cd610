//! Checked narrowing of node payloads.

/// Implemented by a payload sum type for each variant type it can narrow to.
pub trait Narrow<T> {
    /// Kind name reported when narrowing fails.
    const KIND: &'static str;

    fn narrow(&self) -> Option<&T>;
}
