//! Events delivered to discovery subscribers.

use crate::registry::domain::RegistryEvent;

/// Item yielded by a discovery subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryEvent {
    /// A registry change relevant to the subscription's query.
    Change(RegistryEvent),
    /// The subscriber fell behind and `missed` events were dropped.
    ///
    /// Callers that need a complete view should re-run `find`.
    Lagged {
        /// Number of events skipped.
        missed: u64,
    },
}

impl DiscoveryEvent {
    /// Returns the registry change, if this is one.
    #[must_use]
    pub const fn as_change(&self) -> Option<&RegistryEvent> {
        match self {
            Self::Change(event) => Some(event),
            Self::Lagged { .. } => None,
        }
    }
}
