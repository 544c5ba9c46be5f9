//! Agent lifecycle services.

mod managed;
mod supervisor;

pub use managed::ManagedAgent;
pub use supervisor::{AgentSupervisor, SupervisedAgent, SupervisorError, SupervisorResult};
