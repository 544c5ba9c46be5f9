//! Semantic version triple for capabilities.

use super::MalformedCapabilityError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `major.minor.patch` version of a capability.
///
/// Ordering is field-wise, so `1.10.0 > 1.9.3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CapabilityVersion {
    major: u64,
    minor: u64,
    patch: u64,
}

impl CapabilityVersion {
    /// Creates a version from its components.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses `major.minor.patch`.
    ///
    /// Each component must be a non-empty run of ASCII digits; signs,
    /// whitespace and pre-release suffixes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidVersion`] for any other shape.
    pub fn parse(text: &str) -> Result<Self, MalformedCapabilityError> {
        let invalid = || MalformedCapabilityError::InvalidVersion(text.to_owned());
        let mut components = text.split('.').map(|component| {
            if component.is_empty() || !component.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            component.parse::<u64>().map_err(|_| invalid())
        });

        let major = components.next().ok_or_else(invalid)??;
        let minor = components.next().ok_or_else(invalid)??;
        let patch = components.next().ok_or_else(invalid)??;
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }

    /// Returns the major component.
    #[must_use]
    pub const fn major(self) -> u64 {
        self.major
    }

    /// Returns the minor component.
    #[must_use]
    pub const fn minor(self) -> u64 {
        self.minor
    }

    /// Returns the patch component.
    #[must_use]
    pub const fn patch(self) -> u64 {
        self.patch
    }

    /// Returns whether an offer at `offered` can serve a request for `self`.
    ///
    /// Majors must be equal and the offer must not be older than the request.
    #[must_use]
    pub fn is_served_by(self, offered: Self) -> bool {
        self.major == offered.major && offered >= self
    }
}

impl fmt::Display for CapabilityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for CapabilityVersion {
    type Err = MalformedCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
