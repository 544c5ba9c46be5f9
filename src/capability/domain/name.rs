//! Validated capability name type.

use super::MalformedCapabilityError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_NAME_LENGTH: usize = 128;

/// Namespaced capability identifier such as `text.summarize`.
///
/// Names are dot-separated segments; each segment is a non-empty run of
/// ASCII alphanumerics, `_` or `-`. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CapabilityName(String);

impl CapabilityName {
    /// Creates a validated capability name.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::EmptyName`] when the value is empty,
    /// [`MalformedCapabilityError::NameTooLong`] past 128 characters, or
    /// [`MalformedCapabilityError::InvalidName`] for bad characters or empty
    /// segments.
    pub fn new(value: impl Into<String>) -> Result<Self, MalformedCapabilityError> {
        let raw = value.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(MalformedCapabilityError::EmptyName);
        }

        if trimmed.len() > MAX_NAME_LENGTH {
            return Err(MalformedCapabilityError::NameTooLong(raw));
        }

        let is_valid = trimmed.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });

        if !is_valid {
            return Err(MalformedCapabilityError::InvalidName(raw));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CapabilityName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CapabilityName {
    type Error = MalformedCapabilityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CapabilityName> for String {
    fn from(value: CapabilityName) -> Self {
        value.0
    }
}
