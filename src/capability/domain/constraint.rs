//! Typed parameter constraints attached to capabilities.

use super::MalformedCapabilityError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Constraint on a single capability parameter.
///
/// On an offered capability a constraint describes the values the agent
/// supports; on a requested capability it describes the values the caller
/// accepts. A request is satisfied when the two value sets intersect.
///
/// Textual forms: `value` (exact), `a|b|c` (enumeration of two or more
/// values), `lo..hi` (inclusive integer range, either bound may be omitted).
/// Constraints are only built through validated constructors, including
/// when deserialized, so their text form always parses back to the same
/// constraint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ConstraintKind", into = "ConstraintKind")]
pub struct ParameterConstraint(ConstraintKind);

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConstraintKind {
    Exact(String),
    OneOf(BTreeSet<String>),
    Range { min: Option<i64>, max: Option<i64> },
}

impl ParameterConstraint {
    /// Creates an exact-value constraint.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidParameterValue`] when the
    /// value is empty or contains characters outside alphanumerics and
    /// `_ - . : / +`, or contains `..`.
    pub fn exact(key: &str, value: impl Into<String>) -> Result<Self, MalformedCapabilityError> {
        Self::checked(key, ConstraintKind::Exact(value.into()))
    }

    /// Creates an enumeration constraint.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidParameterValue`] when any
    /// value is invalid or fewer than two distinct values are supplied.
    pub fn one_of<I, S>(key: &str, values: I) -> Result<Self, MalformedCapabilityError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = values.into_iter().map(Into::into).collect();
        Self::checked(key, ConstraintKind::OneOf(set))
    }

    /// Creates an inclusive integer range constraint.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidRange`] when both bounds
    /// are absent or `min > max`.
    pub fn range(
        key: &str,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<Self, MalformedCapabilityError> {
        Self::checked(key, ConstraintKind::Range { min, max })
    }

    /// Parses the textual form of a constraint for parameter `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError`] when the text is not a valid
    /// exact value, enumeration or range.
    pub fn parse(key: &str, text: &str) -> Result<Self, MalformedCapabilityError> {
        if let Some((lo, hi)) = text.split_once("..") {
            let invalid_range = || MalformedCapabilityError::InvalidRange {
                key: key.to_owned(),
                value: text.to_owned(),
            };
            let min = parse_bound(lo).map_err(|()| invalid_range())?;
            let max = parse_bound(hi).map_err(|()| invalid_range())?;
            return Self::range(key, min, max);
        }

        if text.contains('|') {
            return Self::one_of(key, text.split('|'));
        }

        Self::exact(key, text)
    }

    /// Checks that the constraint can be written as the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError::InvalidParameterValue`] or
    /// [`MalformedCapabilityError::InvalidRange`] when it cannot.
    pub fn validate(&self, key: &str) -> Result<(), MalformedCapabilityError> {
        match &self.0 {
            ConstraintKind::Exact(value) => validate_token(key, value),
            ConstraintKind::OneOf(values) => {
                values
                    .iter()
                    .try_for_each(|value| validate_token(key, value))?;
                if values.len() < 2 {
                    return Err(MalformedCapabilityError::InvalidParameterValue {
                        key: key.to_owned(),
                        value: self.to_string(),
                    });
                }
                Ok(())
            }
            ConstraintKind::Range { min, max } => {
                let is_valid = match (min, max) {
                    (None, None) => false,
                    (Some(lo), Some(hi)) => lo <= hi,
                    _ => true,
                };
                if is_valid {
                    Ok(())
                } else {
                    Err(MalformedCapabilityError::InvalidRange {
                        key: key.to_owned(),
                        value: self.to_string(),
                    })
                }
            }
        }
    }

    /// Returns whether the values accepted by `self` (a requested
    /// constraint) intersect the values supported by `offered`.
    #[must_use]
    pub fn is_satisfied_by(&self, offered: &Self) -> bool {
        use ConstraintKind::{Exact, OneOf, Range};

        match (&self.0, &offered.0) {
            (Exact(a), Exact(b)) => a == b,
            (Exact(value), OneOf(set)) | (OneOf(set), Exact(value)) => set.contains(value),
            (OneOf(requested), OneOf(supported)) => !requested.is_disjoint(supported),
            (Exact(value), Range { min, max }) | (Range { min, max }, Exact(value)) => {
                numeric_in_range(value, *min, *max)
            }
            (OneOf(set), Range { min, max }) | (Range { min, max }, OneOf(set)) => {
                set.iter().any(|value| numeric_in_range(value, *min, *max))
            }
            (
                Range {
                    min: req_min,
                    max: req_max,
                },
                Range {
                    min: off_min,
                    max: off_max,
                },
            ) => {
                let lower = (*req_min).max(*off_min);
                let upper = match (req_max, off_max) {
                    (Some(a), Some(b)) => Some((*a).min(*b)),
                    (Some(bound), None) | (None, Some(bound)) => Some(*bound),
                    (None, None) => None,
                };
                match (lower, upper) {
                    (Some(lo), Some(hi)) => lo <= hi,
                    _ => true,
                }
            }
        }
    }

    fn checked(key: &str, kind: ConstraintKind) -> Result<Self, MalformedCapabilityError> {
        let constraint = Self(kind);
        constraint.validate(key)?;
        Ok(constraint)
    }
}

impl TryFrom<ConstraintKind> for ParameterConstraint {
    type Error = MalformedCapabilityError;

    fn try_from(value: ConstraintKind) -> Result<Self, Self::Error> {
        Self::checked("parameter", value)
    }
}

impl From<ParameterConstraint> for ConstraintKind {
    fn from(value: ParameterConstraint) -> Self {
        value.0
    }
}

impl fmt::Display for ParameterConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            ConstraintKind::Exact(value) => f.write_str(value),
            ConstraintKind::OneOf(values) => {
                let joined = values.iter().map(String::as_str).collect::<Vec<_>>().join("|");
                f.write_str(&joined)
            }
            ConstraintKind::Range { min, max } => {
                if let Some(lo) = min {
                    write!(f, "{lo}")?;
                }
                f.write_str("..")?;
                if let Some(hi) = max {
                    write!(f, "{hi}")?;
                }
                Ok(())
            }
        }
    }
}

fn validate_token(key: &str, value: &str) -> Result<(), MalformedCapabilityError> {
    let is_valid = !value.is_empty()
        && !value.contains("..")
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':' | '/' | '+'));

    if is_valid {
        Ok(())
    } else {
        Err(MalformedCapabilityError::InvalidParameterValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })
    }
}

fn parse_bound(text: &str) -> Result<Option<i64>, ()> {
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>().map(Some).map_err(|_| ())
}

fn numeric_in_range(value: &str, min: Option<i64>, max: Option<i64>) -> bool {
    value.parse::<i64>().is_ok_and(|number| {
        min.is_none_or(|lo| number >= lo) && max.is_none_or(|hi| number <= hi)
    })
}
