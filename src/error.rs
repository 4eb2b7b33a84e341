use thiserror::Error;

/// Unified error type for git-semver operations
#[derive(Error, Debug)]
pub enum GitSemverError {
    #[error("Missing value: {0}")]
    MissingValue(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Illegal value: {0}")]
    IllegalValue(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Authentication failed for remote '{0}'")]
    RemoteAuth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in git-semver
pub type Result<T> = std::result::Result<T, GitSemverError>;

impl GitSemverError {
    /// A required argument was empty or blank
    pub fn missing(what: impl Into<String>) -> Self {
        GitSemverError::MissingValue(format!("{} is required", what.into()))
    }

    /// Input text did not match the expected grammar
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        GitSemverError::InvalidFormat(msg.into())
    }

    /// Structurally valid but semantically invalid value
    pub fn illegal(msg: impl Into<String>) -> Self {
        GitSemverError::IllegalValue(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitSemverError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        GitSemverError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        GitSemverError::Remote(msg.into())
    }

    /// The remote rejected every credential offered
    pub fn remote_auth(remote: impl Into<String>) -> Self {
        GitSemverError::RemoteAuth(remote.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitSemverError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_missing_value_message() {
        let err = GitSemverError::missing("semver value");
        assert_eq!(err.to_string(), "Missing value: semver value is required");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitSemverError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_git2() {
        let git_err = git2::Error::from_str("object not found");
        let err: GitSemverError = git_err.into();
        assert!(err.to_string().starts_with("Git operation failed"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitSemverError::invalid_format("x"), "Invalid format"),
            (GitSemverError::illegal("x"), "Illegal value"),
            (GitSemverError::config("x"), "Configuration error"),
            (GitSemverError::tag("x"), "Tag error"),
            (GitSemverError::remote("x"), "Remote operation failed"),
            (GitSemverError::remote_auth("origin"), "Authentication failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_error_empty_messages() {
        let errors = vec![
            GitSemverError::invalid_format(""),
            GitSemverError::illegal(""),
            GitSemverError::tag(""),
        ];

        for err in errors {
            // Even with empty message, the error type prefix should be present
            assert!(!err.to_string().is_empty());
        }
    }
}
