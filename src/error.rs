//! Crate-wide error taxonomy.
//!
//! Each bounded context returns its own error type. [`CoreError`] folds them
//! into one enum for callers that handle every failure in one place, and
//! [`ErrorKind`] says how a caller should react to it.

use crate::agent::domain::{AgentError, AgentHealthError, AgentLifecycleError};
use crate::agent::services::SupervisorError;
use crate::capability::domain::MalformedCapabilityError;
use crate::config::ConfigError;
use crate::discovery::services::DiscoveryError;
use crate::registry::domain::{AgentId, ManifestError, RegistryDomainError};
use crate::registry::services::RegistryError;
use thiserror::Error;

/// How a caller should treat a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input from the caller; fix the input, do not retry.
    InvalidInput,
    /// An explicit identifier is already in use.
    Conflict,
    /// The agent no longer exists in the registry.
    NotFound,
    /// The runtime contract was called out of order.
    ProgrammingError,
    /// An agent reported itself unhealthy.
    Health,
    /// An agent implementation failed.
    Runtime,
}

/// Any error produced by this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Capability text or components were invalid.
    #[error(transparent)]
    MalformedCapability(#[from] MalformedCapabilityError),

    /// An explicit identifier collided with a live agent.
    #[error("agent {0} is already registered")]
    DuplicateRegistration(AgentId),

    /// The identifier is absent from the registry.
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    /// The agent runtime contract was violated.
    #[error(transparent)]
    Lifecycle(#[from] AgentLifecycleError),

    /// An agent reported a health failure.
    #[error(transparent)]
    Health(#[from] AgentHealthError),

    /// A descriptor or status rule was violated.
    #[error(transparent)]
    Descriptor(#[from] RegistryDomainError),

    /// A manifest was not valid JSON.
    #[error("invalid agent manifest: {0}")]
    InvalidManifest(#[source] serde_json::Error),

    /// A discovery query was unusable.
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    /// A configuration value was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An agent implementation failed.
    #[error(transparent)]
    Agent(AgentError),
}

impl CoreError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedCapability(_)
            | Self::InvalidManifest(_)
            | Self::Discovery(_)
            | Self::Config(_)
            | Self::Descriptor(
                RegistryDomainError::EmptyDisplayName
                | RegistryDomainError::EmptyCapabilities
                | RegistryDomainError::EmptyEndpoint,
            ) => ErrorKind::InvalidInput,
            Self::DuplicateRegistration(_) => ErrorKind::Conflict,
            Self::UnknownAgent(_) => ErrorKind::NotFound,
            Self::Lifecycle(_)
            | Self::Descriptor(RegistryDomainError::InvalidStatusTransition { .. }) => {
                ErrorKind::ProgrammingError
            }
            Self::Health(_) => ErrorKind::Health,
            Self::Agent(_) => ErrorKind::Runtime,
        }
    }
}

impl From<RegistryError> for CoreError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::DuplicateRegistration(agent_id) => Self::DuplicateRegistration(agent_id),
            RegistryError::UnknownAgent(agent_id) => Self::UnknownAgent(agent_id),
            RegistryError::Domain(error) => Self::Descriptor(error),
        }
    }
}

impl From<AgentError> for CoreError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::Lifecycle(error) => Self::Lifecycle(error),
            AgentError::UnsupportedCapability(_)
            | AgentError::Configuration(_)
            | AgentError::StopTimedOut(_)
            | AgentError::Runtime(_) => Self::Agent(value),
        }
    }
}

impl From<SupervisorError> for CoreError {
    fn from(value: SupervisorError) -> Self {
        match value {
            SupervisorError::Agent(error) => error.into(),
            SupervisorError::Registry(error) => error.into(),
        }
    }
}

impl From<ManifestError> for CoreError {
    fn from(value: ManifestError) -> Self {
        match value {
            ManifestError::Json(error) => Self::InvalidManifest(error),
            ManifestError::Capability(error) => Self::MalformedCapability(error),
            ManifestError::Descriptor(error) => Self::Descriptor(error),
        }
    }
}

/// Result type using [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
