//! Error type for capability parsing and construction.

use thiserror::Error;

/// Invalid capability text or capability component.
///
/// Always a caller input error; never worth retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MalformedCapabilityError {
    /// The capability name is empty after trimming.
    #[error("capability name must not be empty")]
    EmptyName,

    /// The capability name contains invalid characters or empty segments.
    #[error(
        "capability name '{0}' is invalid (dot-separated segments of alphanumerics, '_' or '-')"
    )]
    InvalidName(String),

    /// The capability name exceeds the length limit.
    #[error("capability name exceeds 128 character limit: {0}")]
    NameTooLong(String),

    /// The capability text has no `@version` part.
    #[error("capability '{0}' is missing an '@major.minor.patch' version")]
    MissingVersion(String),

    /// The version is not three dot-separated numeric components.
    #[error("capability version '{0}' must be three numeric components (major.minor.patch)")]
    InvalidVersion(String),

    /// A `?` was present but no parameters followed it.
    #[error("capability '{0}' has an empty parameter list")]
    EmptyParameterList(String),

    /// A parameter segment has no `=value` part.
    #[error("capability parameter '{0}' is missing a value")]
    MissingParameterValue(String),

    /// A parameter key contains invalid characters.
    #[error("capability parameter key '{0}' is invalid (alphanumerics, '_' or '-')")]
    InvalidParameterKey(String),

    /// A parameter value contains invalid characters.
    #[error("capability parameter '{key}' has invalid value '{value}'")]
    InvalidParameterValue {
        /// Parameter key.
        key: String,
        /// Offending value text.
        value: String,
    },

    /// A range constraint is unbounded on both sides, non-numeric, or inverted.
    #[error("capability parameter '{key}' has invalid range '{value}'")]
    InvalidRange {
        /// Parameter key.
        key: String,
        /// Offending range text.
        value: String,
    },

    /// The same parameter key appears more than once.
    #[error("capability parameter '{0}' is declared more than once")]
    DuplicateParameter(String),
}
