//! Semantic version value type
//!
//! Parsing, validation, canonical formatting and increments for versions of the
//! form `[v]major.minor.patch[-prerelease][+build]`. See https://semver.org

use crate::domain::normalize;
use crate::error::{GitSemverError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Longest raw version string accepted by [`Version::parse`]
pub const MAX_LEN: usize = 128;
/// Longest pre-release label, after normalization
pub const MAX_PRE_RELEASE_LABEL_LEN: usize = 48;
/// Longest build metadata, after normalization
pub const MAX_BUILD_METADATA_LEN: usize = 48;

static SEMVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?([0-9]+)\.([0-9]+)\.([0-9]+)(-([0-9A-Za-z.]+))?(\+([0-9A-Za-z.]+))?$")
        .expect("semver grammar is a valid regex")
});

static LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z.]+$").expect("label pattern is a valid regex"));

/// Immutable semantic version.
///
/// Every instance has passed the validating constructor [`Version::try_new`]:
/// labels are normalized (blank collapses to empty, otherwise trimmed), at most
/// 48 characters long, and limited to ASCII letters, digits and periods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    pre_release_label: String,
    build_metadata: String,
    include_v_prefix: bool,
}

/// Which numeric component an increment applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncrementKind {
    /// incompatible API change
    Major,
    /// add features, backward compatible
    Minor,
    /// backward compatible bug fix
    Patch,
}

impl Version {
    /// Create a plain `major.minor.patch` version without labels or prefix
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            pre_release_label: String::new(),
            build_metadata: String::new(),
            include_v_prefix: false,
        }
    }

    /// Validating constructor; every other construction path funnels here.
    ///
    /// # Returns
    /// * `Ok(Version)` - labels normalized and validated
    /// * `Err(IllegalValue)` - a label is too long or has disallowed characters
    pub fn try_new(
        major: u64,
        minor: u64,
        patch: u64,
        pre_release_label: &str,
        build_metadata: &str,
        include_v_prefix: bool,
    ) -> Result<Self> {
        let pre_release_label = normalize(pre_release_label);
        let build_metadata = normalize(build_metadata);

        validate_label("pre-release label", &pre_release_label, MAX_PRE_RELEASE_LABEL_LEN)?;
        validate_label("build metadata", &build_metadata, MAX_BUILD_METADATA_LEN)?;

        Ok(Version {
            major,
            minor,
            patch,
            pre_release_label,
            build_metadata,
            include_v_prefix,
        })
    }

    /// Start a fluent assembly; see [`VersionBuilder`]
    pub fn builder() -> VersionBuilder {
        VersionBuilder::default()
    }

    /// Parse a version string (e.g., "1.2.3", "v3.4.5-beta.3", "v4.5.6+sha809d8g42f87").
    ///
    /// The whole string must match the grammar; no trimming is applied first.
    ///
    /// # Returns
    /// * `Err(MissingValue)` - `raw` is empty or blank
    /// * `Err(InvalidFormat)` - too long, grammar mismatch, or a component overflows `u64`
    /// * `Err(IllegalValue)` - a captured label breaks a construction invariant
    ///
    /// # Example
    /// ```
    /// use git_semver::domain::Version;
    ///
    /// let v = Version::parse("v1.2.3-rc.1").unwrap();
    /// assert_eq!(v.minor(), 2);
    /// assert_eq!(v.pre_release_label(), "rc.1");
    /// assert_eq!(v.to_string(), "v1.2.3-rc.1");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(GitSemverError::missing("semver value"));
        }

        let len = raw.chars().count();
        if len > MAX_LEN {
            return Err(GitSemverError::invalid_format(format!(
                "semver value is too long: length={} max={}",
                len, MAX_LEN
            )));
        }

        let caps = SEMVER.captures(raw).ok_or_else(|| {
            GitSemverError::invalid_format(format!("invalid semver value: '{}'", raw))
        })?;

        let number = |index: usize, name: &str| -> Result<u64> {
            let digits = &caps[index];
            digits.parse::<u64>().map_err(|_| {
                GitSemverError::invalid_format(format!("{} version out of range: {}", name, digits))
            })
        };

        let major = number(1, "major")?;
        let minor = number(2, "minor")?;
        let patch = number(3, "patch")?;
        let pre_release_label = caps.get(5).map_or("", |m| m.as_str());
        let build_metadata = caps.get(7).map_or("", |m| m.as_str());

        Version::try_new(
            major,
            minor,
            patch,
            pre_release_label,
            build_metadata,
            raw.starts_with('v'),
        )
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Pre-release label without the leading `-`; empty when absent
    pub fn pre_release_label(&self) -> &str {
        &self.pre_release_label
    }

    /// Build metadata without the leading `+`; empty when absent
    pub fn build_metadata(&self) -> &str {
        &self.build_metadata
    }

    pub fn include_v_prefix(&self) -> bool {
        self.include_v_prefix
    }

    /// Bump one component by `amount`.
    ///
    /// Pre-release label and build metadata are always dropped, the `v` prefix is kept.
    /// Lower components are left as they are.
    ///
    /// # Returns
    /// * `Err(IllegalValue)` - the component would go below zero or overflow
    ///
    /// # Example
    /// ```
    /// use git_semver::domain::{IncrementKind, Version};
    ///
    /// let v = Version::parse("v1.2.3-beta.4").unwrap();
    /// let next = v.with_increment(IncrementKind::Minor, 1).unwrap();
    /// assert_eq!(next.to_string(), "v1.3.3");
    /// ```
    pub fn with_increment(&self, kind: IncrementKind, amount: i64) -> Result<Self> {
        let (major, minor, patch) = match kind {
            IncrementKind::Major => (offset("major", self.major, amount)?, self.minor, self.patch),
            IncrementKind::Minor => (self.major, offset("minor", self.minor, amount)?, self.patch),
            IncrementKind::Patch => (self.major, self.minor, offset("patch", self.patch, amount)?),
        };

        Version::try_new(major, minor, patch, "", "", self.include_v_prefix)
    }

    /// Bump the major version, drop pre-release and build metadata, retain v prefix
    pub fn with_major_increment(&self, amount: i64) -> Result<Self> {
        self.with_increment(IncrementKind::Major, amount)
    }

    /// Bump the minor version, drop pre-release and build metadata, retain v prefix
    pub fn with_minor_increment(&self, amount: i64) -> Result<Self> {
        self.with_increment(IncrementKind::Minor, amount)
    }

    /// Bump the patch version, drop pre-release and build metadata, retain v prefix
    pub fn with_patch_increment(&self, amount: i64) -> Result<Self> {
        self.with_increment(IncrementKind::Patch, amount)
    }
}

fn offset(name: &str, value: u64, amount: i64) -> Result<u64> {
    value.checked_add_signed(amount).ok_or_else(|| {
        GitSemverError::illegal(format!(
            "{} must be >= 0 and fit in 64 bits: {} + {}",
            name, value, amount
        ))
    })
}

fn validate_label(name: &str, label: &str, max_len: usize) -> Result<()> {
    if label.chars().count() > max_len {
        return Err(GitSemverError::illegal(format!(
            "{} is too long (max {})",
            name, max_len
        )));
    }

    if !label.is_empty() && !LABEL.is_match(label) {
        return Err(GitSemverError::illegal(format!(
            "{} must contain only letters, numbers, and periods: {}",
            name, label
        )));
    }

    Ok(())
}

impl FromStr for Version {
    type Err = GitSemverError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.include_v_prefix {
            write!(f, "v")?;
        }

        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if !self.pre_release_label.is_empty() {
            write!(f, "-{}", self.pre_release_label)?;
        }

        if !self.build_metadata.is_empty() {
            write!(f, "+{}", self.build_metadata)?;
        }

        Ok(())
    }
}

impl FromStr for IncrementKind {
    type Err = GitSemverError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(IncrementKind::Major),
            "minor" => Ok(IncrementKind::Minor),
            "patch" => Ok(IncrementKind::Patch),
            other => Err(GitSemverError::invalid_format(format!(
                "unknown increment kind '{}' (expected major, minor or patch)",
                other
            ))),
        }
    }
}

impl fmt::Display for IncrementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncrementKind::Major => write!(f, "major"),
            IncrementKind::Minor => write!(f, "minor"),
            IncrementKind::Patch => write!(f, "patch"),
        }
    }
}

/// Fluent assembly helper for [`Version`].
///
/// Holds raw, unvalidated parts; [`VersionBuilder::build`] runs them through
/// [`Version::try_new`].
#[derive(Debug, Clone, Default)]
pub struct VersionBuilder {
    major: u64,
    minor: u64,
    patch: u64,
    pre_release_label: Option<String>,
    build_metadata: Option<String>,
    include_v_prefix: bool,
}

impl VersionBuilder {
    pub fn major(mut self, val: u64) -> Self {
        self.major = val;
        self
    }

    pub fn minor(mut self, val: u64) -> Self {
        self.minor = val;
        self
    }

    pub fn patch(mut self, val: u64) -> Self {
        self.patch = val;
        self
    }

    pub fn pre_release_label(mut self, val: impl Into<String>) -> Self {
        self.pre_release_label = Some(val.into());
        self
    }

    pub fn build_metadata(mut self, val: impl Into<String>) -> Self {
        self.build_metadata = Some(val.into());
        self
    }

    pub fn include_v_prefix(mut self, val: bool) -> Self {
        self.include_v_prefix = val;
        self
    }

    pub fn build(self) -> Result<Version> {
        Version::try_new(
            self.major,
            self.minor,
            self.patch,
            self.pre_release_label.as_deref().unwrap_or(""),
            self.build_metadata.as_deref().unwrap_or(""),
            self.include_v_prefix,
        )
    }
}

/// Semver version bump on text.
///
/// Parses `old_version` ("0.1.2" or "v0.1.2"), increments `kind` by one and
/// formats the result ("0.1.3" or "v0.1.3").
///
/// # Example
/// ```
/// use git_semver::domain::{bump_version, IncrementKind};
///
/// assert_eq!(bump_version("v0.0.0", IncrementKind::Major).unwrap(), "v1.0.0");
/// ```
pub fn bump_version(old_version: &str, kind: IncrementKind) -> Result<String> {
    if old_version.trim().is_empty() {
        return Err(GitSemverError::missing("old version"));
    }

    Ok(Version::parse(old_version)?.with_increment(kind, 1)?.to_string())
}
