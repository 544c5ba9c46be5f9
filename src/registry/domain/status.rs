//! Agent lifecycle status and its state machine.

use super::ParseAgentStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a registered agent.
///
/// ```text
/// Starting ─▶ Ready ◀─▶ Degraded
///    │          │          │
///    └────────▶ Draining ◀─┘ ─▶ Stopped
/// ```
///
/// Every non-terminal status may also move straight to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// Registered but not yet confirmed healthy.
    Starting,
    /// Healthy and eligible for discovery.
    Ready,
    /// Reporting unhealthy; excluded from discovery unless tolerated.
    Degraded,
    /// Finishing in-flight work before stopping.
    Draining,
    /// Terminal; the entry leaves the live directory.
    Stopped,
}

impl AgentStatus {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Degraded => "degraded",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Starting | Self::Ready | Self::Degraded,
                Self::Ready | Self::Degraded | Self::Draining | Self::Stopped
            ) | (Self::Draining, Self::Draining | Self::Stopped)
        )
    }

    /// Returns whether the status is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AgentStatus {
    type Error = ParseAgentStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "starting" => Ok(Self::Starting),
            "ready" => Ok(Self::Ready),
            "degraded" => Ok(Self::Degraded),
            "draining" => Ok(Self::Draining),
            "stopped" => Ok(Self::Stopped),
            _ => Err(ParseAgentStatusError(value.to_owned())),
        }
    }
}
