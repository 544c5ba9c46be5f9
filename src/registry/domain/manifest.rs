//! Declarative agent manifests.

use super::{DescriptorFragment, Endpoint, RegistryDomainError};
use crate::capability::domain::{Capability, MalformedCapabilityError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Serialisable declaration of an agent, with capabilities in their
/// canonical text form.
///
/// ```json
/// {
///   "display_name": "Thumbnailer",
///   "capabilities": ["image.resize@2.1.0?format=jpeg|png"],
///   "endpoint": { "kind": "network", "address": "http://10.0.0.4:7000" },
///   "metadata": { "load": "3" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentManifest {
    /// Human-readable agent name.
    pub display_name: String,
    /// Capabilities in canonical text form.
    pub capabilities: Vec<String>,
    /// Invocation endpoint.
    pub endpoint: Endpoint,
    /// Free-form metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Errors returned while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest is not valid JSON for this shape.
    #[error("invalid agent manifest: {0}")]
    Json(#[from] serde_json::Error),
    /// A capability string failed to parse.
    #[error(transparent)]
    Capability(#[from] MalformedCapabilityError),
    /// The declaration violates descriptor invariants.
    #[error(transparent)]
    Descriptor(#[from] RegistryDomainError),
}

impl AgentManifest {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Json`] when the text does not deserialize.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Converts the manifest into a validated descriptor fragment.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Capability`] for malformed capability text
    /// and [`ManifestError::Descriptor`] for a blank name, a blank endpoint
    /// or an empty capability list.
    pub fn into_fragment(self) -> Result<DescriptorFragment, ManifestError> {
        let capabilities = self
            .capabilities
            .iter()
            .map(|text| Capability::parse(text))
            .collect::<Result<Vec<_>, _>>()?;

        if self.endpoint.address().trim().is_empty() {
            return Err(RegistryDomainError::EmptyEndpoint.into());
        }

        let declared = DescriptorFragment::new(self.display_name, capabilities, self.endpoint)?;
        Ok(self
            .metadata
            .into_iter()
            .fold(declared, |fragment, (key, value)| {
                fragment.with_metadata(key, value)
            }))
    }
}
