//! Domain model for capability declarations and matching.

mod capability;
mod constraint;
mod error;
mod name;
mod version;

pub use capability::{Capability, matches};
pub use constraint::ParameterConstraint;
pub use error::MalformedCapabilityError;
pub use name::CapabilityName;
pub use version::CapabilityVersion;
