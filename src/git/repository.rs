use crate::domain::AnnotatedTag;
use crate::error::{GitSemverError, Result};
use crate::git::{short_message, short_tag_name, validate_new_tag, TAGS_REFSPEC, TAG_REF_PREFIX};
use chrono::DateTime;
use git2::{Cred, CredentialType, ErrorClass, ErrorCode, ObjectType, Oid, Repository as Git2Repo};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository from `path` upwards
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        debug!(path = %repo.path().display(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Open the repository whose git directory is `git_dir`
    ///
    /// # Arguments
    /// * `git_dir` - a ".git" directory or a bare repository such as "project.git";
    ///   relative paths resolve against the working directory, `.` and `..` are folded
    pub fn open_git_dir<P: AsRef<Path>>(git_dir: P) -> Result<Self> {
        let git_dir = git_dir.as_ref();
        let absolute = if git_dir.is_absolute() {
            git_dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(git_dir)
        };
        let normalized = normalize_path(&absolute);

        let is_git_dir = normalized
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".git"));
        if !is_git_dir {
            return Err(GitSemverError::illegal(format!(
                "git dir path must end with '.git': {}",
                normalized.display()
            )));
        }

        let repo = Git2Repo::open(&normalized).map_err(|e| {
            GitSemverError::tag(format!(
                "Failed to open git dir {}: {}",
                normalized.display(),
                e
            ))
        })?;
        debug!(path = %normalized.display(), "opened git dir");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn find_remote(&self, remote: &str) -> Result<git2::Remote<'_>> {
        if remote.trim().is_empty() {
            return Err(GitSemverError::missing("remote"));
        }

        self.repo
            .find_remote(remote)
            .map_err(|e| GitSemverError::remote(format!("Cannot find remote '{}': {}", remote, e)))
    }
}

/// Fold `.` and `..` components without touching the filesystem
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

const SSH_KEY_NAMES: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

/// Credentials offered so far during one remote operation
///
/// libgit2 asks again after every rejection, so each source is offered once:
/// SSH keys from ~/.ssh/, then the SSH agent, then defaults.
#[derive(Debug, Default)]
struct CredentialAttempts {
    keys_tried: usize,
    agent_tried: bool,
    default_tried: bool,
}

impl CredentialAttempts {
    fn next(
        &mut self,
        username: &str,
        allowed_types: CredentialType,
        keys: &[PathBuf],
    ) -> std::result::Result<Cred, git2::Error> {
        if allowed_types.contains(CredentialType::SSH_KEY) {
            while self.keys_tried < keys.len() {
                let path = &keys[self.keys_tried];
                self.keys_tried += 1;
                if let Ok(cred) = Cred::ssh_key(username, None, path, None) {
                    return Ok(cred);
                }
            }

            if !self.agent_tried {
                self.agent_tried = true;
                if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                    return Ok(cred);
                }
            }
        }

        if !self.default_tried {
            self.default_tried = true;
            return Cred::default();
        }

        Err(git2::Error::new(
            ErrorCode::Auth,
            ErrorClass::Callback,
            "no more credentials to try",
        ))
    }
}

fn ssh_key_paths() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };
    SSH_KEY_NAMES
        .iter()
        .map(|key| home.join(".ssh").join(key))
        .filter(|path| path.exists())
        .collect()
}

fn remote_callbacks() -> git2::RemoteCallbacks<'static> {
    let keys = ssh_key_paths();
    let mut attempts = CredentialAttempts::default();

    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(move |_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");
        attempts.next(username, allowed_types, &keys)
    });
    callbacks
}

impl super::TagRepository for Git2Repository {
    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn find_tag(&self, tag_name: &str) -> Result<Option<AnnotatedTag>> {
        let name = short_tag_name(tag_name)?;

        let reference = match self.repo.find_reference(&format!("{}{}", TAG_REF_PREFIX, name)) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => {
                return Err(GitSemverError::tag(format!(
                    "Cannot find tag '{}': {}",
                    name, e
                )))
            }
        };

        let target = reference
            .target()
            .ok_or_else(|| GitSemverError::tag(format!("Tag '{}' has no target", name)))?;
        let object = self.repo.find_object(target, None)?;
        if object.kind() != Some(ObjectType::Tag) {
            return Err(GitSemverError::tag(format!(
                "Tag '{}' is a lightweight tag and has no annotations",
                name
            )));
        }

        let tag = self.repo.find_tag(target)?;
        let tagger = tag
            .tagger()
            .ok_or_else(|| GitSemverError::tag(format!("Tag '{}' has no tagger", name)))?;
        let ts = DateTime::from_timestamp(tagger.when().seconds(), 0).ok_or_else(|| {
            GitSemverError::tag(format!("Tag '{}' has an invalid timestamp", name))
        })?;
        let full_message = tag.message().unwrap_or("");
        let short_name = tag
            .name()
            .ok_or_else(|| GitSemverError::missing("short name"))?;

        let annotated = AnnotatedTag::builder()
            .ts(ts)
            .short_name(short_name)
            .full_message(full_message)
            .short_message(short_message(full_message))
            .tagger(tagger.name().unwrap_or(""))
            .tagger_email(tagger.email().unwrap_or(""))
            .build()?;

        Ok(Some(annotated))
    }

    fn create_tag(&self, tag_name: &str, message: &str) -> Result<Oid> {
        validate_new_tag(tag_name, message)?;

        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.repo.signature()?;

        match self
            .repo
            .tag(tag_name, head.as_object(), &signature, message, false)
        {
            Ok(oid) => {
                info!(tag = tag_name, commit = %head.id(), "created tag");
                Ok(oid)
            }
            Err(e) if e.code() == ErrorCode::Exists => Err(GitSemverError::tag(format!(
                "Tag '{}' already exists",
                tag_name
            ))),
            Err(e) => Err(GitSemverError::tag(format!("Cannot create tag: {}", e))),
        }
    }

    fn fetch_tags(&self, remote: &str) -> Result<()> {
        let mut remote_handle = self.find_remote(remote)?;

        let mut fetch_options = git2::FetchOptions::new();
        fetch_options.remote_callbacks(remote_callbacks());

        debug!(remote, refspec = TAGS_REFSPEC, "fetching tags");
        remote_handle
            .fetch(&[TAGS_REFSPEC], Some(&mut fetch_options), None)
            .map_err(|e| match e.code() {
                ErrorCode::Auth => GitSemverError::remote_auth(remote),
                _ => GitSemverError::remote(format!(
                    "Failed to fetch from remote '{}': {}",
                    remote, e
                )),
            })?;

        info!(remote, "fetched tags");
        Ok(())
    }

    fn push_tags(&self, remote: &str) -> Result<Vec<String>> {
        let mut remote_handle = self.find_remote(remote)?;

        let tags = self.list_tags()?;
        if tags.is_empty() {
            debug!(remote, "no tags to push");
            return Ok(tags);
        }

        let refspecs: Vec<String> = tags
            .iter()
            .map(|tag| format!("{0}{1}:{0}{1}", TAG_REF_PREFIX, tag))
            .collect();
        let refspec_strs: Vec<&str> = refspecs.iter().map(|s| s.as_str()).collect();

        let mut callbacks = remote_callbacks();
        callbacks.push_update_reference(|refname, status| match status {
            Some(status) => {
                warn!(refname, status, "remote rejected reference");
                Err(git2::Error::from_str(&format!(
                    "Push rejected for {}: {}",
                    refname, status
                )))
            }
            None => Ok(()),
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);

        remote_handle
            .push(&refspec_strs, Some(&mut push_options))
            .map_err(|e| match (e.code(), e.class()) {
                (ErrorCode::Auth, _) => GitSemverError::remote_auth(remote),
                (_, ErrorClass::Net) => {
                    GitSemverError::remote(format!("Network error during push: {}", e))
                }
                _ => GitSemverError::remote(format!("Push failed: {}", e)),
            })?;

        info!(remote, count = tags.len(), "pushed tags");
        Ok(tags)
    }
}
