//! Discovery queries.

use super::SelectionPolicy;
use crate::capability::domain::{Capability, MalformedCapabilityError};
use crate::registry::domain::{AgentDescriptor, AgentStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Capabilities a caller needs plus how to pick among the agents offering
/// them.
///
/// An agent matches when every requirement is satisfied by at least one of
/// its offered capabilities. Only `Ready` agents are eligible unless
/// [`Self::including_degraded`] also admits `Degraded` ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryQuery {
    requirements: Vec<Capability>,
    #[serde(default)]
    policy: SelectionPolicy,
    #[serde(default)]
    include_degraded: bool,
    #[serde(default)]
    limit: Option<usize>,
}

impl DiscoveryQuery {
    /// Creates a first-match query over the given requirements.
    ///
    /// Duplicate requirements collapse.
    #[must_use]
    pub fn new(requirements: impl IntoIterator<Item = Capability>) -> Self {
        let unique: BTreeSet<Capability> = requirements.into_iter().collect();
        Self {
            requirements: unique.into_iter().collect(),
            policy: SelectionPolicy::default(),
            include_degraded: false,
            limit: None,
        }
    }

    /// Creates a query from canonical capability strings.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedCapabilityError`] for the first string that does not
    /// parse.
    pub fn parse<I, S>(specs: I) -> Result<Self, MalformedCapabilityError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let requirements = specs
            .into_iter()
            .map(|spec| Capability::parse(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(requirements))
    }

    /// Sets the selection policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Admits `Degraded` agents as well as `Ready` ones.
    #[must_use]
    pub const fn including_degraded(mut self) -> Self {
        self.include_degraded = true;
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the required capabilities in canonical order.
    #[must_use]
    pub fn requirements(&self) -> &[Capability] {
        &self.requirements
    }

    /// Returns the selection policy.
    #[must_use]
    pub const fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Returns whether `Degraded` agents are eligible.
    #[must_use]
    pub const fn includes_degraded(&self) -> bool {
        self.include_degraded
    }

    /// Returns the result cap, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns whether an agent in `status` may be returned.
    #[must_use]
    pub const fn admits(&self, status: AgentStatus) -> bool {
        matches!(status, AgentStatus::Ready)
            || (self.include_degraded && matches!(status, AgentStatus::Degraded))
    }

    /// Returns whether the descriptor offers every required capability,
    /// regardless of status.
    #[must_use]
    pub fn is_offered_by(&self, descriptor: &AgentDescriptor) -> bool {
        self.is_offered_among(descriptor.capabilities())
    }

    /// Returns whether `offered` satisfies every required capability.
    #[must_use]
    pub fn is_offered_among(&self, offered: &BTreeSet<Capability>) -> bool {
        self.requirements.iter().all(|requested| {
            offered
                .iter()
                .any(|candidate| requested.is_satisfied_by(candidate))
        })
    }

    /// Returns whether the descriptor is an eligible match.
    #[must_use]
    pub fn matches(&self, descriptor: &AgentDescriptor) -> bool {
        self.admits(descriptor.status()) && self.is_offered_by(descriptor)
    }
}
