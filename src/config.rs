use crate::domain::{IncrementKind, Version};
use crate::error::{GitSemverError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "gitsemver.toml";

/// Placeholder replaced by the version in tag message templates
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Represents the complete configuration for git-semver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub tags: TagsConfig,
}

fn default_remote_name() -> String {
    "origin".to_string()
}

fn default_message() -> String {
    format!("Release {}", VERSION_PLACEHOLDER)
}

fn default_increment() -> IncrementKind {
    IncrementKind::Patch
}

/// Remote used by fetch and push.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_name")]
    pub name: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        RemoteConfig {
            name: default_remote_name(),
        }
    }
}

/// Tag creation settings.
///
/// `message` is a template; `{version}` is replaced by the tag's version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default)]
    pub push: bool,

    #[serde(default = "default_increment")]
    pub default_increment: IncrementKind,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            message: default_message(),
            push: false,
            default_increment: default_increment(),
        }
    }
}

impl Config {
    /// Tag message for `version` rendered from the configured template
    pub fn tag_message(&self, version: &Version) -> String {
        self.tags
            .message
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Reject settings that would only fail later, at tag or push time
    pub fn validate(&self) -> Result<()> {
        if self.remote.name.trim().is_empty() {
            return Err(GitSemverError::config("remote.name must not be empty"));
        }
        if self.tags.message.trim().is_empty() {
            return Err(GitSemverError::config("tags.message must not be empty"));
        }
        Ok(())
    }
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text).map_err(|e| GitSemverError::config(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Locate the configuration file, if any.
///
/// Lookup order:
/// 1. Custom path provided as parameter
/// 2. `gitsemver.toml` in current directory
/// 3. `.gitsemver.toml` in user config directory
pub fn config_path(custom: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = custom {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `custom` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed, or a custom path is missing
pub fn load_config(custom: Option<&str>) -> Result<Config> {
    let Some(path) = config_path(custom) else {
        debug!("no config file found, using defaults");
        return Ok(Config::default());
    };

    let text = fs::read_to_string(&path).map_err(|e| {
        GitSemverError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    debug!(path = %path.display(), "loaded config");
    parse_config(&text)
}
