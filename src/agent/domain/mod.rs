//! Domain model for agent runtimes.

mod config;
mod error;
mod health;
mod invocation;
mod lifecycle;

pub use config::AgentConfig;
pub use error::AgentError;
pub use health::{AgentHealthError, HealthStatus};
pub use invocation::Invocation;
pub use lifecycle::{AgentLifecycleError, LifecycleOperation, LifecyclePhase};
