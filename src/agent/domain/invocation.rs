//! Requests addressed to a running agent.

use crate::capability::domain::Capability;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A JSON payload addressed to one capability of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    capability: Capability,
    payload: Value,
}

impl Invocation {
    /// Creates an invocation.
    #[must_use]
    pub const fn new(capability: Capability, payload: Value) -> Self {
        Self {
            capability,
            payload,
        }
    }

    /// Returns the requested capability.
    #[must_use]
    pub const fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Returns the payload.
    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    /// Consumes the invocation, returning the payload.
    #[must_use]
    pub fn into_payload(self) -> Value {
        self.payload
    }
}
