use crate::domain::normalize;
use crate::error::{GitSemverError, Result};
use chrono::{DateTime, Utc};

/// Metadata of an annotated git tag
///
/// Decoupled from [`crate::domain::Version`]: the short name is whatever the tag
/// is called, it is never parsed here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedTag {
    ts: DateTime<Utc>,
    full_message: String,
    short_name: String,
    short_message: String,
    tagger: String,
    tagger_email: String,
}

impl AnnotatedTag {
    /// Create a tag record; `short_name` is required, the text fields are normalized
    pub fn new(
        ts: DateTime<Utc>,
        short_name: &str,
        full_message: &str,
        short_message: &str,
        tagger: &str,
        tagger_email: &str,
    ) -> Result<Self> {
        let short_name = normalize(short_name);
        if short_name.is_empty() {
            return Err(GitSemverError::missing("short name"));
        }

        Ok(AnnotatedTag {
            ts,
            full_message: normalize(full_message),
            short_name,
            short_message: normalize(short_message),
            tagger: normalize(tagger),
            tagger_email: normalize(tagger_email),
        })
    }

    pub fn builder() -> AnnotatedTagBuilder {
        AnnotatedTagBuilder::default()
    }

    /// When the tag was made (tagger time, UTC)
    pub fn ts(&self) -> DateTime<Utc> {
        self.ts
    }

    pub fn full_message(&self) -> &str {
        &self.full_message
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn tagger(&self) -> &str {
        &self.tagger
    }

    pub fn tagger_email(&self) -> &str {
        &self.tagger_email
    }
}

/// Fluent assembly helper for [`AnnotatedTag`]
#[derive(Debug, Clone, Default)]
pub struct AnnotatedTagBuilder {
    ts: Option<DateTime<Utc>>,
    full_message: Option<String>,
    short_name: Option<String>,
    short_message: Option<String>,
    tagger: Option<String>,
    tagger_email: Option<String>,
}

impl AnnotatedTagBuilder {
    pub fn ts(mut self, val: DateTime<Utc>) -> Self {
        self.ts = Some(val);
        self
    }

    pub fn full_message(mut self, val: impl Into<String>) -> Self {
        self.full_message = Some(val.into());
        self
    }

    pub fn short_name(mut self, val: impl Into<String>) -> Self {
        self.short_name = Some(val.into());
        self
    }

    pub fn short_message(mut self, val: impl Into<String>) -> Self {
        self.short_message = Some(val.into());
        self
    }

    pub fn tagger(mut self, val: impl Into<String>) -> Self {
        self.tagger = Some(val.into());
        self
    }

    pub fn tagger_email(mut self, val: impl Into<String>) -> Self {
        self.tagger_email = Some(val.into());
        self
    }

    /// # Returns
    /// * `Err(MissingValue)` - `ts` was never set or `short_name` is blank
    pub fn build(self) -> Result<AnnotatedTag> {
        let ts = self.ts.ok_or_else(|| GitSemverError::missing("ts"))?;

        AnnotatedTag::new(
            ts,
            self.short_name.as_deref().unwrap_or(""),
            self.full_message.as_deref().unwrap_or(""),
            self.short_message.as_deref().unwrap_or(""),
            self.tagger.as_deref().unwrap_or(""),
            self.tagger_email.as_deref().unwrap_or(""),
        )
    }
}
