use crate::domain::AnnotatedTag;
use crate::error::{GitSemverError, Result};
use crate::git::{short_message, short_tag_name, validate_new_tag, TagRepository};
use chrono::{DateTime, Utc};
use git2::Oid;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// A tag held by [MockRepository]; `None` annotations mean a lightweight tag
#[derive(Debug, Clone)]
struct MockTag {
    oid: Oid,
    annotation: Option<AnnotatedTag>,
}

#[derive(Debug, Default)]
struct MockState {
    tags: BTreeMap<String, MockTag>,
    remotes: BTreeMap<String, BTreeSet<String>>,
    denied_remotes: BTreeSet<String>,
    next_oid: u8,
}

/// Mock repository for testing without actual git operations
///
/// Remotes are plain sets of tag names; fetch copies names in, push copies them out.
#[derive(Debug, Default)]
pub struct MockRepository {
    state: Mutex<MockState>,
    tagger: String,
    tagger_email: String,
    now: Option<DateTime<Utc>>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tagger: "Mock Tagger".to_string(),
            tagger_email: "tagger@example.com".to_string(),
            ..Default::default()
        }
    }

    /// Pin the timestamp used for tags created through [TagRepository::create_tag]
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    /// Add an existing lightweight tag
    pub fn add_lightweight_tag(&self, name: impl Into<String>) {
        let mut state = self.lock();
        let oid = state.allocate_oid();
        state.tags.insert(
            name.into(),
            MockTag {
                oid,
                annotation: None,
            },
        );
    }

    /// Add an existing annotated tag
    pub fn add_annotated_tag(&self, tag: AnnotatedTag) {
        let mut state = self.lock();
        let oid = state.allocate_oid();
        state.tags.insert(
            tag.short_name().to_string(),
            MockTag {
                oid,
                annotation: Some(tag),
            },
        );
    }

    /// Register a remote holding the given tag names
    pub fn add_remote<I, S>(&self, name: impl Into<String>, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lock()
            .remotes
            .insert(name.into(), tags.into_iter().map(Into::into).collect());
    }

    /// Make every fetch from and push to `name` fail authentication
    pub fn deny_remote(&self, name: impl Into<String>) {
        self.lock().denied_remotes.insert(name.into());
    }

    /// Tag names currently held by a remote
    pub fn remote_tags(&self, remote: &str) -> Option<Vec<String>> {
        self.lock()
            .remotes
            .get(remote)
            .map(|tags| tags.iter().cloned().collect())
    }

    /// Object ID a tag points at
    pub fn tag_oid(&self, name: &str) -> Option<Oid> {
        self.lock().tags.get(name).map(|tag| tag.oid)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl MockState {
    fn allocate_oid(&mut self) -> Oid {
        self.next_oid = self.next_oid.wrapping_add(1);
        Oid::from_bytes(&[self.next_oid; 20]).unwrap_or_else(|_| Oid::zero())
    }
}

impl TagRepository for MockRepository {
    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.lock().tags.keys().cloned().collect())
    }

    fn find_tag(&self, tag_name: &str) -> Result<Option<AnnotatedTag>> {
        let name = short_tag_name(tag_name)?;

        match self.lock().tags.get(name) {
            None => Ok(None),
            Some(MockTag {
                annotation: Some(tag),
                ..
            }) => Ok(Some(tag.clone())),
            Some(_) => Err(GitSemverError::tag(format!(
                "Tag '{}' is a lightweight tag and has no annotations",
                name
            ))),
        }
    }

    fn create_tag(&self, tag_name: &str, message: &str) -> Result<Oid> {
        validate_new_tag(tag_name, message)?;

        let mut state = self.lock();
        if state.tags.contains_key(tag_name) {
            return Err(GitSemverError::tag(format!(
                "Tag '{}' already exists",
                tag_name
            )));
        }

        let annotation = AnnotatedTag::builder()
            .ts(self.now.unwrap_or_else(Utc::now))
            .short_name(tag_name)
            .full_message(message)
            .short_message(short_message(message))
            .tagger(self.tagger.as_str())
            .tagger_email(self.tagger_email.as_str())
            .build()?;

        let oid = state.allocate_oid();
        state.tags.insert(
            tag_name.to_string(),
            MockTag {
                oid,
                annotation: Some(annotation),
            },
        );
        Ok(oid)
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut state = self.lock();
        if state.denied_remotes.contains(remote) {
            return Err(GitSemverError::remote_auth(remote));
        }
        let incoming = state
            .remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| GitSemverError::remote(format!("Cannot find remote '{}'", remote)))?;

        for name in incoming {
            if !state.tags.contains_key(&name) {
                let oid = state.allocate_oid();
                state.tags.insert(
                    name,
                    MockTag {
                        oid,
                        annotation: None,
                    },
                );
            }
        }
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> Result<Vec<String>> {
        let mut state = self.lock();
        if state.denied_remotes.contains(remote) {
            return Err(GitSemverError::remote_auth(remote));
        }
        let names: Vec<String> = state.tags.keys().cloned().collect();
        let target = state
            .remotes
            .get_mut(remote)
            .ok_or_else(|| GitSemverError::remote(format!("Cannot find remote '{}'", remote)))?;

        target.extend(names.iter().cloned());
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_create_and_find() {
        let repo = MockRepository::new();
        let oid = repo.create_tag("v1.0.0", "Release 1.0.0\n\nNotes").unwrap();
        assert_ne!(oid, Oid::zero());
        assert_eq!(repo.tag_oid("v1.0.0"), Some(oid));

        let tag = repo.find_tag("refs/tags/v1.0.0").unwrap().unwrap();
        assert_eq!(tag.short_name(), "v1.0.0");
        assert_eq!(tag.short_message(), "Release 1.0.0");
        assert_eq!(tag.tagger(), "Mock Tagger");
        assert_eq!(repo.find_tag("v2.0.0").unwrap(), None);
    }

    #[test]
    fn test_mock_repository_rejects_duplicates() {
        let repo = MockRepository::new();
        repo.create_tag("1.0.0", "first").unwrap();
        assert!(matches!(
            repo.create_tag("1.0.0", "second"),
            Err(GitSemverError::Tag(_))
        ));
    }

    #[test]
    fn test_mock_repository_lightweight_tag() {
        let repo = MockRepository::new();
        repo.add_lightweight_tag("v0.1.0");
        assert!(matches!(repo.find_tag("v0.1.0"), Err(GitSemverError::Tag(_))));
    }

    #[test]
    fn test_mock_repository_list_tags_sorted() {
        let repo = MockRepository::new();
        repo.add_lightweight_tag("v2.0.0");
        repo.add_lightweight_tag("v1.0.0");

        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0", "v2.0.0"]);
    }

    #[test]
    fn test_mock_repository_fetch_and_push() {
        let repo = MockRepository::new();
        repo.add_remote("origin", ["v0.9.0"]);
        repo.add_lightweight_tag("v1.0.0");

        repo.fetch_tags("origin").unwrap();
        assert_eq!(repo.list_tags().unwrap(), vec!["v0.9.0", "v1.0.0"]);

        let pushed = repo.push_tags("origin").unwrap();
        assert_eq!(pushed.len(), 2);
        assert_eq!(
            repo.remote_tags("origin").unwrap(),
            vec!["v0.9.0", "v1.0.0"]
        );

        assert!(matches!(
            repo.fetch_tags("upstream"),
            Err(GitSemverError::Remote(_))
        ));
    }

    #[test]
    fn test_denied_remote_fails_authentication() {
        let repo = MockRepository::new();
        repo.add_lightweight_tag("v1.0.0");
        repo.add_remote("origin", ["v0.9.0"]);
        repo.deny_remote("origin");

        assert!(matches!(
            repo.fetch_tags("origin"),
            Err(GitSemverError::RemoteAuth(_))
        ));
        assert!(matches!(
            repo.push_tags("origin"),
            Err(GitSemverError::RemoteAuth(_))
        ));
        assert_eq!(repo.remote_tags("origin").unwrap(), vec!["v0.9.0"]);
    }

    #[test]
    fn test_mock_repository_default() {
        let repo = MockRepository::default();
        assert!(repo.list_tags().unwrap().is_empty());
    }
}
