//! Command logic behind the `git-semver` binary
//!
//! Everything here is generic over [TagRepository] and free of terminal I/O,
//! so `main.rs` only parses arguments, prompts and renders results.

use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{AnnotatedTag, IncrementKind, Version};
use crate::error::{GitSemverError, Result};
use crate::git::TagRepository;

/// A tag name and, if it parses, its version
#[derive(Debug, Clone, PartialEq)]
pub struct TagListing {
    pub name: String,
    pub version: Option<Version>,
}

/// Result of listing tags
#[derive(Debug, Clone, PartialEq)]
pub struct ListOutcome {
    pub tags: Vec<TagListing>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Arguments for creating a tag from an explicit version
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTagArgs {
    /// Version text used as the tag name
    pub version: String,
    /// Tag message; the configured template when absent
    pub message: Option<String>,
    /// Preview mode - don't create the tag
    pub dry_run: bool,
}

/// Arguments for bumping an existing version and tagging the result
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseArgs {
    /// Current version or tag name
    pub current: String,
    /// Component to bump; the configured default when absent
    pub kind: Option<IncrementKind>,
    pub message: Option<String>,
    pub dry_run: bool,
}

/// Result of a tag creation (or its preview)
#[derive(Debug, Clone, PartialEq)]
pub struct TagOutcome {
    pub version: Version,
    pub message: String,
    /// False in dry-run mode
    pub created: bool,
}

/// Result of a fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Fetched { remote: String },
    /// Authentication failed; local tags are still usable
    Skipped(BoundaryWarning),
}

/// Result of a push
#[derive(Debug, Clone, PartialEq)]
pub enum PushOutcome {
    Pushed { remote: String, tags: Vec<String> },
    Skipped(BoundaryWarning),
}

/// Bump `raw` by `amount` of `kind`
pub fn bump(raw: &str, kind: IncrementKind, amount: i64) -> Result<Version> {
    if raw.trim().is_empty() {
        return Err(GitSemverError::missing("version"));
    }
    Version::parse(raw)?.with_increment(kind, amount)
}

/// List every tag, flagging the ones that are not versions
pub fn list_tags<R: TagRepository>(repo: &R) -> Result<ListOutcome> {
    let names = repo.list_tags()?;
    let mut warnings = Vec::new();

    if names.is_empty() {
        warnings.push(BoundaryWarning::NoTags);
    }

    let tags = names
        .into_iter()
        .map(|name| {
            let version = match Version::parse(&name) {
                Ok(version) => Some(version),
                Err(e) => {
                    warnings.push(BoundaryWarning::UnparsableTag {
                        tag: name.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
            };
            TagListing { name, version }
        })
        .collect();

    Ok(ListOutcome { tags, warnings })
}

/// Look up an annotated tag, failing when it does not exist
pub fn show_tag<R: TagRepository>(repo: &R, name: &str) -> Result<AnnotatedTag> {
    repo.find_tag(name)?
        .ok_or_else(|| GitSemverError::tag(format!("Tag '{}' not found", name.trim())))
}

/// Create an annotated tag named after a version
pub fn create_tag<R: TagRepository>(
    repo: &R,
    config: &Config,
    args: CreateTagArgs,
) -> Result<TagOutcome> {
    if args.version.trim().is_empty() {
        return Err(GitSemverError::missing("version"));
    }
    let version = Version::parse(&args.version)?;
    tag_version(repo, config, version, args.message, args.dry_run)
}

/// Bump `current` and tag the result
pub fn release<R: TagRepository>(
    repo: &R,
    config: &Config,
    args: ReleaseArgs,
) -> Result<TagOutcome> {
    let kind = args.kind.unwrap_or(config.tags.default_increment);
    let version = bump(&args.current, kind, 1)?;
    info!(from = %args.current, to = %version, %kind, "bumped version");

    tag_version(repo, config, version, args.message, args.dry_run)
}

fn tag_version<R: TagRepository>(
    repo: &R,
    config: &Config,
    version: Version,
    message: Option<String>,
    dry_run: bool,
) -> Result<TagOutcome> {
    let message = match message {
        Some(message) if !message.trim().is_empty() => message,
        Some(_) => return Err(GitSemverError::missing("message")),
        None => config.tag_message(&version),
    };

    if dry_run {
        debug!(tag = %version, "dry run, tag not created");
        return Ok(TagOutcome {
            version,
            message,
            created: false,
        });
    }

    repo.create_version_tag(&version, &message)?;
    Ok(TagOutcome {
        version,
        message,
        created: true,
    })
}

/// Fetch tags; authentication failures degrade to a warning
pub fn fetch<R: TagRepository>(repo: &R, remote: &str) -> Result<FetchOutcome> {
    match repo.fetch_tags(remote) {
        Ok(()) => Ok(FetchOutcome::Fetched {
            remote: remote.to_string(),
        }),
        Err(e @ GitSemverError::RemoteAuth(_)) => {
            debug!(remote, error = %e, "fetch authentication failed");
            Ok(FetchOutcome::Skipped(
                BoundaryWarning::FetchAuthenticationFailed {
                    remote: remote.to_string(),
                },
            ))
        }
        Err(e) => Err(e),
    }
}

/// Push every local tag to `remote`
pub fn push<R: TagRepository>(repo: &R, remote: &str) -> Result<PushOutcome> {
    if repo.list_tags()?.is_empty() {
        return Ok(PushOutcome::Skipped(BoundaryWarning::NothingToPush {
            remote: remote.to_string(),
        }));
    }

    let tags = repo.push_tags(remote)?;
    Ok(PushOutcome::Pushed {
        remote: remote.to_string(),
        tags,
    })
}

/// Remote named on the command line, else the configured one
pub fn resolve_remote(cli_remote: Option<&str>, config: &Config) -> String {
    cli_remote
        .filter(|remote| !remote.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| config.remote.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    #[test]
    fn test_bump_amount() {
        let v = bump("v1.2.3-rc.1", IncrementKind::Minor, 2).unwrap();
        assert_eq!(v.to_string(), "v1.4.3");
        assert!(matches!(
            bump("", IncrementKind::Minor, 1),
            Err(GitSemverError::MissingValue(_))
        ));
    }

    #[test]
    fn test_list_tags_flags_unparsable() {
        let repo = MockRepository::new();
        repo.add_lightweight_tag("v1.0.0");
        repo.add_lightweight_tag("nightly");

        let outcome = list_tags(&repo).unwrap();
        assert_eq!(outcome.tags.len(), 2);
        assert_eq!(outcome.tags[0].name, "nightly");
        assert!(outcome.tags[0].version.is_none());
        assert_eq!(outcome.tags[1].version, Version::parse("v1.0.0").ok());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_list_tags_empty() {
        let repo = MockRepository::new();
        let outcome = list_tags(&repo).unwrap();
        assert_eq!(outcome.warnings, vec![BoundaryWarning::NoTags]);
    }

    #[test]
    fn test_release_uses_default_increment_and_template() {
        let repo = MockRepository::new();
        let config = Config::default();
        let outcome = release(
            &repo,
            &config,
            ReleaseArgs {
                current: "v0.3.9-beta.2".to_string(),
                kind: None,
                message: None,
                dry_run: false,
            },
        )
        .unwrap();

        assert_eq!(outcome.version.to_string(), "v0.3.10");
        assert_eq!(outcome.message, "Release v0.3.10");
        assert!(outcome.created);
        assert!(repo.find_tag("v0.3.10").unwrap().is_some());
    }

    #[test]
    fn test_create_tag_dry_run_creates_nothing() {
        let repo = MockRepository::new();
        let outcome = create_tag(
            &repo,
            &Config::default(),
            CreateTagArgs {
                version: "2.0.0".to_string(),
                message: Some("Big release".to_string()),
                dry_run: true,
            },
        )
        .unwrap();

        assert!(!outcome.created);
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_create_tag_blank_message() {
        let repo = MockRepository::new();
        let result = create_tag(
            &repo,
            &Config::default(),
            CreateTagArgs {
                version: "2.0.0".to_string(),
                message: Some("  ".to_string()),
                dry_run: false,
            },
        );
        assert!(matches!(result, Err(GitSemverError::MissingValue(_))));
    }

    #[test]
    fn test_show_missing_tag() {
        let repo = MockRepository::new();
        assert!(matches!(
            show_tag(&repo, "v9.9.9"),
            Err(GitSemverError::Tag(_))
        ));
    }

    #[test]
    fn test_push_without_tags_is_skipped() {
        let repo = MockRepository::new();
        repo.add_remote("origin", Vec::<String>::new());
        assert_eq!(
            push(&repo, "origin").unwrap(),
            PushOutcome::Skipped(BoundaryWarning::NothingToPush {
                remote: "origin".to_string()
            })
        );
    }

    #[test]
    fn test_fetch_auth_failure_is_skipped() {
        let repo = MockRepository::new();
        repo.add_remote("origin", ["v1.0.0"]);
        repo.deny_remote("origin");

        assert_eq!(
            fetch(&repo, "origin").unwrap(),
            FetchOutcome::Skipped(BoundaryWarning::FetchAuthenticationFailed {
                remote: "origin".to_string()
            })
        );
    }

    #[test]
    fn test_fetch_failure_from_auth_like_remote_name_is_an_error() {
        let repo = MockRepository::new();
        for remote in ["authority", "oauth-mirror", "credentials"] {
            assert!(
                matches!(fetch(&repo, remote), Err(GitSemverError::Remote(_))),
                "fetch from missing remote '{}' should fail",
                remote
            );
        }
    }

    #[test]
    fn test_resolve_remote() {
        let config = Config::default();
        assert_eq!(resolve_remote(None, &config), "origin");
        assert_eq!(resolve_remote(Some("upstream"), &config), "upstream");
        assert_eq!(resolve_remote(Some(" "), &config), "origin");
    }
}
