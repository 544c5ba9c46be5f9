//! Invocation endpoint of a registered agent.

use super::RegistryDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address used by consumers to reach an agent.
///
/// The registry never dereferences an endpoint; it only stores and returns
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "address", rename_all = "snake_case")]
pub enum Endpoint {
    /// A handle naming an agent hosted in the same process.
    InProcess(String),
    /// A network location such as `grpc://10.0.0.4:7000`.
    Network(String),
}

impl Endpoint {
    /// Creates an in-process endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyEndpoint`] when the handle is blank.
    pub fn in_process(handle: impl Into<String>) -> Result<Self, RegistryDomainError> {
        non_empty(handle.into()).map(Self::InProcess)
    }

    /// Creates a network endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryDomainError::EmptyEndpoint`] when the address is blank.
    pub fn network(address: impl Into<String>) -> Result<Self, RegistryDomainError> {
        non_empty(address.into()).map(Self::Network)
    }

    /// Returns the handle or address text.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::InProcess(address) | Self::Network(address) => address,
        }
    }

    /// Returns whether the endpoint is hosted in this process.
    #[must_use]
    pub const fn is_in_process(&self) -> bool {
        matches!(self, Self::InProcess(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InProcess(handle) => write!(f, "local:{handle}"),
            Self::Network(address) => f.write_str(address),
        }
    }
}

fn non_empty(raw: String) -> Result<String, RegistryDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RegistryDomainError::EmptyEndpoint);
    }
    Ok(trimmed.to_owned())
}
