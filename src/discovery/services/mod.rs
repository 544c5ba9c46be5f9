//! Discovery services.

mod discovery;
mod subscription;

pub use discovery::{DiscoveryError, DiscoveryResult, DiscoveryService};
pub use subscription::Subscription;
