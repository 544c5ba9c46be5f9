//! Tunables for the registry and discovery services.
//!
//! Both structs are plain data with public fields, sensible defaults and
//! serde support so they can be embedded in a host application's own
//! configuration file.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Upper bound accepted for [`RegistryConfig::event_capacity`].
pub const MAX_EVENT_CAPACITY: usize = 1 << 16;

/// Default load-hint metadata key read by least-loaded selection.
pub const DEFAULT_LOAD_HINT_KEY: &str = "load";

/// Invalid configuration value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration that must be positive is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The event buffer capacity is outside `1..=MAX_EVENT_CAPACITY`.
    #[error("event_capacity must be between 1 and {MAX_EVENT_CAPACITY}, got {0}")]
    EventCapacity(usize),

    /// The load-hint metadata key is blank.
    #[error("load_hint_key must not be empty")]
    EmptyLoadHintKey,
}

/// Registry liveness and event settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Age of the last heartbeat after which the sweep expires an agent.
    pub heartbeat_timeout: Duration,
    /// How often the background sweeper runs.
    pub sweep_interval: Duration,
    /// How long deregistered identifiers keep answering duplicate
    /// deregistrations with success.
    pub tombstone_grace: Duration,
    /// Per-subscriber buffer of change events before a slow subscriber
    /// starts missing events.
    pub event_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(30),
            sweep_interval: Duration::from_secs(5),
            tombstone_grace: Duration::from_secs(300),
            event_capacity: 1024,
        }
    }
}

impl RegistryConfig {
    /// Short timeouts for tests and tightly supervised local deployments.
    #[must_use]
    pub const fn aggressive() -> Self {
        Self {
            heartbeat_timeout: Duration::from_secs(3),
            sweep_interval: Duration::from_millis(500),
            tombstone_grace: Duration::from_secs(30),
            event_capacity: 256,
        }
    }

    /// Checks field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a zero timeout or sweep interval, or an
    /// event capacity outside `1..=MAX_EVENT_CAPACITY`.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "heartbeat_timeout",
            });
        }
        if self.sweep_interval.is_zero() {
            return Err(ConfigError::ZeroDuration {
                field: "sweep_interval",
            });
        }
        if self.event_capacity == 0 || self.event_capacity > MAX_EVENT_CAPACITY {
            return Err(ConfigError::EventCapacity(self.event_capacity));
        }
        Ok(())
    }

    /// Heartbeat timeout as a signed time delta.
    #[must_use]
    pub fn heartbeat_timeout_delta(&self) -> TimeDelta {
        to_time_delta(self.heartbeat_timeout)
    }

    /// Tombstone grace as a signed time delta.
    #[must_use]
    pub fn tombstone_grace_delta(&self) -> TimeDelta {
        to_time_delta(self.tombstone_grace)
    }
}

/// Discovery ranking settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Metadata key holding a non-negative integer load hint.
    pub load_hint_key: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            load_hint_key: DEFAULT_LOAD_HINT_KEY.to_owned(),
        }
    }
}

impl DiscoveryConfig {
    /// Checks that the load-hint key is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLoadHintKey`] when the key is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.load_hint_key.trim().is_empty() {
            return Err(ConfigError::EmptyLoadHintKey);
        }
        Ok(())
    }
}

fn to_time_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
