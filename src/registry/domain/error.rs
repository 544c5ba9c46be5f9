//! Error types for registry domain validation and parsing.

use super::AgentStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating registry domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryDomainError {
    /// The display name is empty after trimming.
    #[error("agent display name must not be empty")]
    EmptyDisplayName,

    /// A descriptor must offer at least one capability.
    #[error("agent must declare at least one capability")]
    EmptyCapabilities,

    /// The endpoint address is empty after trimming.
    #[error("agent endpoint must not be empty")]
    EmptyEndpoint,

    /// The requested status change is not allowed by the state machine.
    #[error("invalid agent status transition: {from} -> {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: AgentStatus,
        /// Requested status.
        to: AgentStatus,
    },
}

/// Error returned while parsing an agent status from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown agent status: {0}")]
pub struct ParseAgentStatusError(pub String);

/// Error returned while parsing an agent identifier from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid agent identifier: {0}")]
pub struct ParseAgentIdError(pub String);
