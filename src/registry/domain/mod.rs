//! Domain model for the agent registry.
//!
//! Descriptors identify an agent and the capabilities it offers; entries
//! wrap a descriptor with the revision counter that orders its mutations.
//! Status changes follow the state machine in [`AgentStatus`].

mod descriptor;
mod endpoint;
mod entry;
mod error;
mod event;
mod fragment;
mod ids;
mod manifest;
mod status;

pub use descriptor::AgentDescriptor;
pub use endpoint::Endpoint;
pub use entry::RegistryEntry;
pub use error::{ParseAgentIdError, ParseAgentStatusError, RegistryDomainError};
pub use event::{ChangeKind, RegistryEvent, RemovalReason};
pub use fragment::DescriptorFragment;
pub use ids::{AgentId, Revision};
pub use manifest::{AgentManifest, ManifestError};
pub use status::AgentStatus;
