use std::fmt;

/// Warnings that occur at the repository boundary.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The repository has no tags at all
    NoTags,
    /// Tag exists but cannot be parsed as a semantic version
    UnparsableTag { tag: String, reason: String },
    /// Fetch operation failed due to authentication issues
    FetchAuthenticationFailed { remote: String },
    /// Push was skipped because no tags exist locally
    NothingToPush { remote: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoTags => write!(f, "Repository has no tags"),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}' as a version: {}", tag, reason)
            }
            BoundaryWarning::FetchAuthenticationFailed { remote } => {
                write!(
                    f,
                    "Authentication failed when fetching from remote '{}'",
                    remote
                )
            }
            BoundaryWarning::NothingToPush { remote } => {
                write!(f, "No local tags to push to remote '{}'", remote)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = BoundaryWarning::UnparsableTag {
            tag: "release-1".to_string(),
            reason: "Invalid format: invalid semver value: 'release-1'".to_string(),
        };
        assert!(warning.to_string().starts_with("Cannot parse tag 'release-1'"));
        assert_eq!(BoundaryWarning::NoTags.to_string(), "Repository has no tags");
    }
}
