//! Configuration handed to an agent at initialization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form agent settings.
///
/// The registry does not interpret these; they are passed through to
/// [`AgentRuntime::initialize`](crate::agent::ports::AgentRuntime::initialize).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentConfig(Map<String, Value>);

impl AgentConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a setting, replacing any previous value.
    #[must_use]
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Returns a setting by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a string setting by key.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Returns all settings.
    #[must_use]
    pub const fn settings(&self) -> &Map<String, Value> {
        &self.0
    }
}
