//! Runtime lifecycle phases of an agent instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Phase of an agent instance inside its own process.
///
/// Distinct from the registry's `AgentStatus`, which is the directory's view
/// of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    /// Constructed; `initialize` not yet called.
    Created,
    /// Initialized and ready to start.
    Initialized,
    /// Started and serving.
    Running,
    /// Stopped; terminal for this instance.
    Stopped,
    /// A lifecycle call failed; terminal for this instance.
    Failed,
}

impl LifecyclePhase {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Initialized => "initialized",
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for LifecyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle operation that was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOperation {
    /// `initialize`
    Initialize,
    /// `start`
    Start,
    /// `stop`
    Stop,
    /// `invoke`
    Invoke,
}

impl fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initialize => "initialize",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Invoke => "invoke",
        })
    }
}

/// The agent runtime contract was called out of order.
///
/// A programming error: surfaced immediately and never retried.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot {operation} an agent in the {phase} phase")]
pub struct AgentLifecycleError {
    /// Operation that was attempted.
    pub operation: LifecycleOperation,
    /// Phase the agent was in.
    pub phase: LifecyclePhase,
}

impl AgentLifecycleError {
    /// Creates a lifecycle error.
    #[must_use]
    pub const fn new(operation: LifecycleOperation, phase: LifecyclePhase) -> Self {
        Self { operation, phase }
    }
}
