//! Agent-supplied part of a descriptor.

use super::{Endpoint, RegistryDomainError};
use crate::capability::domain::Capability;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// What an agent declares about itself: everything in a descriptor except
/// the identity, status and timestamps the registry assigns.
///
/// Produced by [`AgentRuntime::describe`](crate::agent::ports::AgentRuntime::describe)
/// and consumed by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorFragment {
    display_name: String,
    capabilities: BTreeSet<Capability>,
    endpoint: Endpoint,
    metadata: BTreeMap<String, String>,
}

impl DescriptorFragment {
    /// Creates a validated fragment.
    ///
    /// The display name is trimmed and duplicate capabilities collapse.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyDisplayName`] when the name is
    /// blank, or [`RegistryDomainError::EmptyCapabilities`] when no
    /// capability is supplied.
    pub fn new(
        display_name: impl Into<String>,
        capabilities: impl IntoIterator<Item = Capability>,
        endpoint: Endpoint,
    ) -> Result<Self, RegistryDomainError> {
        let trimmed_name = display_name.into().trim().to_owned();
        if trimmed_name.is_empty() {
            return Err(RegistryDomainError::EmptyDisplayName);
        }

        let declared: BTreeSet<Capability> = capabilities.into_iter().collect();
        if declared.is_empty() {
            return Err(RegistryDomainError::EmptyCapabilities);
        }

        Ok(Self {
            display_name: trimmed_name,
            capabilities: declared,
            endpoint,
            metadata: BTreeMap::new(),
        })
    }

    /// Adds a free-form metadata entry, replacing any previous value.
    ///
    /// Metadata is ignored by capability matching; discovery reads the
    /// configured load-hint key from it.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the declared capabilities.
    #[must_use]
    pub const fn capabilities(&self) -> &BTreeSet<Capability> {
        &self.capabilities
    }

    /// Returns the endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Returns the metadata map.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        BTreeSet<Capability>,
        Endpoint,
        BTreeMap<String, String>,
    ) {
        (
            self.display_name,
            self.capabilities,
            self.endpoint,
            self.metadata,
        )
    }
}
