//! Registry services.

mod index;
mod registry;
mod sweeper;

pub use registry::{AgentRegistry, RegistryError, RegistryResult};
pub use sweeper::{LivenessSweeper, SweeperHandle};
