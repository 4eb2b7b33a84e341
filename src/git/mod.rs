//! Git tag operations abstraction layer
//!
//! A thin, trait-based pass-through over the tag operations git-semver needs.
//! The concrete implementations are:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! Callers should depend on [TagRepository] rather than a concrete type.
//!
//! ```rust
//! # use git_semver::git::TagRepository;
//! # fn example<R: TagRepository>(repo: &R) -> git_semver::Result<()> {
//! for tag in repo.list_tags()? {
//!     println!("{}", tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{AnnotatedTag, Version};
use crate::error::{GitSemverError, Result};
use git2::Oid;

/// Prefix of every tag reference
pub const TAG_REF_PREFIX: &str = "refs/tags/";

/// Refspec mapping all remote tags onto local tags
pub const TAGS_REFSPEC: &str = "refs/tags/*:refs/tags/*";

/// Tag operations over a repository
///
/// ## Error Handling
///
/// Blank names and messages fail with [GitSemverError::MissingValue] before any
/// git access. Failures of the underlying library map to the `Git`, `Tag` or
/// `Remote` variants.
pub trait TagRepository: Send {
    /// Get all tag names, sorted alphabetically
    ///
    /// Equivalent: `git tag --list`
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Look up an annotated tag by name
    ///
    /// Equivalent: `git show <tag_name>`
    ///
    /// # Arguments
    /// * `tag_name` - short name ("v0.0.4") or full reference ("refs/tags/v0.0.4")
    ///
    /// # Returns
    /// * `Ok(Some(AnnotatedTag))` - the tag exists and is annotated
    /// * `Ok(None)` - no such tag
    /// * `Err` - blank name, lightweight tag, or git error
    fn find_tag(&self, tag_name: &str) -> Result<Option<AnnotatedTag>>;

    /// Create an annotated tag on `HEAD`
    ///
    /// Equivalent: `git tag -a <tag_name> -m <message>`
    ///
    /// # Arguments
    /// * `tag_name` - any valid semver string
    /// * `message` - anything helpful for human tag readers
    ///
    /// # Returns
    /// * `Ok(Oid)` - object ID of the new tag
    /// * `Err` - invalid name, blank message, tag already exists, or git error
    fn create_tag(&self, tag_name: &str, message: &str) -> Result<Oid>;

    /// Create an annotated tag named after `version`'s canonical form
    fn create_version_tag(&self, version: &Version, message: &str) -> Result<Oid> {
        self.create_tag(&version.to_string(), message)
    }

    /// Fetch all tags from a remote
    ///
    /// Equivalent: `git fetch <remote> --tags`
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Push every local tag to a remote, returning the names pushed
    ///
    /// Equivalent: `git push <remote> --tags`
    fn push_tags(&self, remote: &str) -> Result<Vec<String>>;
}

/// Strip an optional `refs/tags/` prefix, rejecting blank names
pub(crate) fn short_tag_name(tag_name: &str) -> Result<&str> {
    let name = tag_name.trim();
    let name = name.strip_prefix(TAG_REF_PREFIX).unwrap_or(name);
    if name.is_empty() {
        return Err(GitSemverError::missing("tag name"));
    }
    Ok(name)
}

/// Checks shared by every `create_tag` implementation
pub(crate) fn validate_new_tag(tag_name: &str, message: &str) -> Result<()> {
    if tag_name.trim().is_empty() {
        return Err(GitSemverError::missing("tag name"));
    }
    if message.trim().is_empty() {
        return Err(GitSemverError::missing("message"));
    }
    Version::parse(tag_name)?;
    Ok(())
}

/// Collapse the first paragraph of a message onto one line
pub(crate) fn short_message(full_message: &str) -> String {
    full_message
        .trim()
        .split("\n\n")
        .next()
        .unwrap_or("")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_tag_name() {
        assert_eq!(short_tag_name("v1.0.0").unwrap(), "v1.0.0");
        assert_eq!(short_tag_name("refs/tags/v1.0.0").unwrap(), "v1.0.0");
        assert!(matches!(
            short_tag_name(" "),
            Err(GitSemverError::MissingValue(_))
        ));
        assert!(short_tag_name("refs/tags/").is_err());
    }

    #[test]
    fn test_validate_new_tag() {
        assert!(validate_new_tag("v1.2.3", "Release").is_ok());
        assert!(matches!(
            validate_new_tag("v1.2.3", "  "),
            Err(GitSemverError::MissingValue(_))
        ));
        assert!(matches!(
            validate_new_tag("release-1", "Release"),
            Err(GitSemverError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_short_message() {
        assert_eq!(short_message("Release 1.0\n\nBody text"), "Release 1.0");
        assert_eq!(short_message("first\nsecond\n\nbody"), "first second");
        assert_eq!(short_message(""), "");
    }
}
