//! Domain model for discovery.

mod event;
mod policy;
mod query;

pub use event::DiscoveryEvent;
pub use policy::{ParseSelectionPolicyError, SelectionPolicy};
pub use query::DiscoveryQuery;
