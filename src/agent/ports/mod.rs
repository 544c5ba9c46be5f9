//! Port contracts implemented by agent runtimes.

pub mod runtime;

pub use runtime::{AgentResult, AgentRuntime};
