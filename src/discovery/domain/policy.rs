//! Candidate ordering for discovery results.

use crate::capability::domain::{Capability, CapabilityVersion};
use crate::registry::domain::AgentDescriptor;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::fmt;
use thiserror::Error;

/// Unrecognised selection policy text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown selection policy: {0}")]
pub struct ParseSelectionPolicyError(pub String);

/// How matching candidates are ordered.
///
/// Every policy breaks ties by ascending agent identifier, so results are
/// deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Ascending agent identifier.
    #[default]
    FirstMatch,
    /// Ascending load hint read from descriptor metadata; agents without a
    /// parseable hint sort last.
    LeastLoaded,
    /// Newest matching capability version first, compared requirement by
    /// requirement.
    HighestVersion,
}

impl SelectionPolicy {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstMatch => "first-match",
            Self::LeastLoaded => "least-loaded",
            Self::HighestVersion => "highest-version",
        }
    }

    /// Orders matching descriptors best first.
    pub(crate) fn rank(
        self,
        mut candidates: Vec<AgentDescriptor>,
        requirements: &[Capability],
        load_hint_key: &str,
    ) -> Vec<AgentDescriptor> {
        match self {
            Self::FirstMatch => candidates.sort_by_key(AgentDescriptor::agent_id),
            Self::LeastLoaded => candidates.sort_by_cached_key(|descriptor| {
                (load_hint(descriptor, load_hint_key), descriptor.agent_id())
            }),
            Self::HighestVersion => candidates.sort_by_cached_key(|descriptor| {
                (
                    Reverse(matched_versions(descriptor, requirements)),
                    descriptor.agent_id(),
                )
            }),
        }
        candidates
    }
}

/// Present hints order before absent ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LoadHint(Option<u64>);

impl Ord for LoadHint {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl PartialOrd for LoadHint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn load_hint(descriptor: &AgentDescriptor, key: &str) -> LoadHint {
    LoadHint(
        descriptor
            .metadata()
            .get(key)
            .and_then(|raw| raw.trim().parse::<u64>().ok()),
    )
}

fn matched_versions(
    descriptor: &AgentDescriptor,
    requirements: &[Capability],
) -> Vec<Option<CapabilityVersion>> {
    requirements
        .iter()
        .map(|requested| {
            descriptor
                .offers(requested)
                .map(Capability::version)
                .max()
        })
        .collect()
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SelectionPolicy {
    type Error = ParseSelectionPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim() {
            "first-match" => Ok(Self::FirstMatch),
            "least-loaded" => Ok(Self::LeastLoaded),
            "highest-version" => Ok(Self::HighestVersion),
            other => Err(ParseSelectionPolicyError(other.to_owned())),
        }
    }
}
