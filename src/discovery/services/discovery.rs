//! Capability lookup over the registry.

use super::Subscription;
use crate::config::{ConfigError, DiscoveryConfig};
use crate::discovery::domain::DiscoveryQuery;
use crate::registry::domain::{AgentDescriptor, RegistryEntry};
use crate::registry::services::AgentRegistry;
use mockable::Clock;
use thiserror::Error;
use tracing::debug;

/// Errors returned by discovery operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiscoveryError {
    /// A lookup named no required capability.
    #[error("discovery query must require at least one capability")]
    EmptyQuery,
}

/// Result type for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// Read-only query and subscription layer over an [`AgentRegistry`].
pub struct DiscoveryService<C>
where
    C: Clock + Send + Sync,
{
    registry: AgentRegistry<C>,
    config: DiscoveryConfig,
}

impl<C> Clone for DiscoveryService<C>
where
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            config: self.config.clone(),
        }
    }
}

impl<C> DiscoveryService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a discovery service with [`DiscoveryConfig::default`].
    #[must_use]
    pub fn new(registry: AgentRegistry<C>) -> Self {
        Self {
            registry,
            config: DiscoveryConfig::default(),
        }
    }

    /// Creates a discovery service with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the configuration does not validate.
    pub fn with_config(
        registry: AgentRegistry<C>,
        config: DiscoveryConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Returns eligible agents satisfying every requirement, best first.
    ///
    /// An empty result means nothing currently matches; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::EmptyQuery`] when the query has no
    /// requirements.
    pub fn find(&self, query: &DiscoveryQuery) -> DiscoveryResult<Vec<AgentDescriptor>> {
        if query.requirements().is_empty() {
            return Err(DiscoveryError::EmptyQuery);
        }

        let candidates: Vec<AgentDescriptor> = self
            .registry
            .entries_offering(query.requirements())
            .into_iter()
            .map(RegistryEntry::into_descriptor)
            .filter(|descriptor| query.matches(descriptor))
            .collect();

        let mut ranked =
            query
                .policy()
                .rank(candidates, query.requirements(), &self.config.load_hint_key);
        if let Some(limit) = query.limit() {
            ranked.truncate(limit);
        }

        debug!(
            requirements = query.requirements().len(),
            policy = %query.policy(),
            matched = ranked.len(),
            "discovery query resolved"
        );
        Ok(ranked)
    }

    /// Returns the best eligible agent, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::EmptyQuery`] when the query has no
    /// requirements.
    pub fn find_one(&self, query: &DiscoveryQuery) -> DiscoveryResult<Option<AgentDescriptor>> {
        Ok(self.find(query)?.into_iter().next())
    }

    /// Streams subsequent registry changes for agents offering the query's
    /// requirements.
    ///
    /// Events are filtered on capabilities only, so status changes and
    /// removals of matching agents are delivered whatever their status. A
    /// query with no requirements watches every agent.
    #[must_use]
    pub fn subscribe(&self, query: DiscoveryQuery) -> Subscription {
        debug!(
            requirements = query.requirements().len(),
            "discovery subscription opened"
        );
        Subscription::new(self.registry.subscribe_events(), query)
    }
}
