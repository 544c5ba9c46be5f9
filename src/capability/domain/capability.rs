//! Capability value type, canonical text form, and matching.

use super::{CapabilityName, CapabilityVersion, MalformedCapabilityError, ParameterConstraint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named, versioned, optionally parameterised skill.
///
/// The canonical text form is `name@major.minor.patch` followed by an
/// optional `?key=value&...` suffix with keys in ascending order. Parsing and
/// formatting round-trip: `Capability::parse(&c.to_string()) == Ok(c)`.
///
/// ```
/// use dynamus::capability::domain::Capability;
///
/// let offered = Capability::parse("image.resize@2.1.0?format=png|jpeg").unwrap();
/// let requested = Capability::parse("image.resize@2.0.0?format=png").unwrap();
/// assert!(requested.is_satisfied_by(&offered));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Capability {
    name: CapabilityName,
    version: CapabilityVersion,
    parameters: BTreeMap<String, ParameterConstraint>,
}

impl Capability {
    /// Creates an unparameterised capability.
    #[must_use]
    pub const fn new(name: CapabilityName, version: CapabilityVersion) -> Self {
        Self {
            name,
            version,
            parameters: BTreeMap::new(),
        }
    }

    /// Adds a parameter constraint.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidParameterKey`] for keys
    /// outside `[A-Za-z0-9_-]+`, the constraint's own validation error when
    /// its values cannot be written in canonical text, and
    /// [`MalformedCapabilityError::DuplicateParameter`] when the key is
    /// already constrained.
    pub fn with_parameter(
        mut self,
        key: impl Into<String>,
        constraint: ParameterConstraint,
    ) -> Result<Self, MalformedCapabilityError> {
        let owned_key = key.into();
        validate_key(&owned_key)?;
        constraint.validate(&owned_key)?;
        if self.parameters.contains_key(&owned_key) {
            return Err(MalformedCapabilityError::DuplicateParameter(owned_key));
        }
        self.parameters.insert(owned_key, constraint);
        Ok(self)
    }

    /// Parses the canonical text form.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError`] for invalid name characters,
    /// missing or non-numeric version components, malformed parameters, or
    /// duplicate parameter keys.
    pub fn parse(text: &str) -> Result<Self, MalformedCapabilityError> {
        let trimmed = text.trim();
        let (raw_name, rest) = trimmed
            .split_once('@')
            .ok_or_else(|| MalformedCapabilityError::MissingVersion(trimmed.to_owned()))?;

        let name = CapabilityName::new(raw_name)?;
        let (raw_version, raw_parameters) = rest
            .split_once('?')
            .map_or((rest, None), |(version, parameters)| (version, Some(parameters)));
        let mut capability = Self::new(name, CapabilityVersion::parse(raw_version)?);

        let Some(parameters) = raw_parameters else {
            return Ok(capability);
        };

        if parameters.is_empty() {
            return Err(MalformedCapabilityError::EmptyParameterList(
                trimmed.to_owned(),
            ));
        }

        for segment in parameters.split('&') {
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| MalformedCapabilityError::MissingParameterValue(segment.to_owned()))?;
            validate_key(key)?;
            let constraint = ParameterConstraint::parse(key, value)?;
            capability = capability.with_parameter(key, constraint)?;
        }

        Ok(capability)
    }

    /// Returns the capability name.
    #[must_use]
    pub const fn name(&self) -> &CapabilityName {
        &self.name
    }

    /// Returns the capability version.
    #[must_use]
    pub const fn version(&self) -> CapabilityVersion {
        self.version
    }

    /// Returns the parameter constraints keyed by parameter name.
    #[must_use]
    pub const fn parameters(&self) -> &BTreeMap<String, ParameterConstraint> {
        &self.parameters
    }

    /// Returns the constraint for one parameter, if declared.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&ParameterConstraint> {
        self.parameters.get(key)
    }

    /// Returns whether `offered` satisfies this capability as a request.
    ///
    /// Names must be equal, majors equal, the offered version no older than
    /// the requested one, and every requested parameter constraint must be
    /// met by an offered constraint on the same key. Parameters the request
    /// does not mention are wildcards.
    #[must_use]
    pub fn is_satisfied_by(&self, offered: &Self) -> bool {
        self.name == offered.name
            && self.version.is_served_by(offered.version)
            && self.parameters.iter().all(|(key, requested)| {
                offered
                    .parameters
                    .get(key)
                    .is_some_and(|supported| requested.is_satisfied_by(supported))
            })
    }
}

/// Returns whether `offered` satisfies `requested`.
///
/// Free-function form of [`Capability::is_satisfied_by`].
#[must_use]
pub fn matches(requested: &Capability, offered: &Capability) -> bool {
    requested.is_satisfied_by(offered)
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)?;
        let mut separator = '?';
        for (key, constraint) in &self.parameters {
            write!(f, "{separator}{key}={constraint}")?;
            separator = '&';
        }
        Ok(())
    }
}

impl FromStr for Capability {
    type Err = MalformedCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Capability {
    type Error = MalformedCapabilityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Capability> for String {
    fn from(value: Capability) -> Self {
        value.to_string()
    }
}

fn validate_key(key: &str) -> Result<(), MalformedCapabilityError> {
    let is_valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if is_valid {
        Ok(())
    } else {
        Err(MalformedCapabilityError::InvalidParameterKey(key.to_owned()))
    }
}
