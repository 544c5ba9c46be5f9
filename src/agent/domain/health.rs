//! Agent health reporting.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Non-fatal health failure reported by an agent.
///
/// Carried by heartbeats; it degrades the agent's registry status instead
/// of failing the heartbeat call.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("agent unhealthy: {reason}")]
pub struct AgentHealthError {
    reason: String,
}

impl AgentHealthError {
    /// Creates a health error with a trimmed reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into().trim().to_owned(),
        }
    }

    /// Returns the reason text.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Health reported by an agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    /// The agent is serving normally.
    Healthy,
    /// The agent is reachable but impaired.
    Unhealthy(AgentHealthError),
    /// Health cannot be determined yet.
    Unknown,
}

impl HealthStatus {
    /// Creates an unhealthy status with the given reason.
    #[must_use]
    pub fn unhealthy(reason: impl Into<String>) -> Self {
        Self::Unhealthy(AgentHealthError::new(reason))
    }

    /// Returns whether the status is `Healthy`.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::Unhealthy(err) => write!(f, "unhealthy ({})", err.reason()),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}
