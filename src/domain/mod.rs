//! Domain logic - pure value types independent of git operations

pub mod tag;
pub mod version;

pub use tag::{AnnotatedTag, AnnotatedTagBuilder};
pub use version::{bump_version, IncrementKind, Version, VersionBuilder};

/// Collapse blank text to empty and trim everything else.
pub(crate) fn normalize(raw: &str) -> String {
    raw.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n"), "");
        assert_eq!(normalize("  beta.1 "), "beta.1");
        assert_eq!(normalize("rc"), "rc");
    }
}
