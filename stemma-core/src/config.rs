//! Sink configuration.
//!
//! Resolved once at process start, before any event is built. Configuration
//! is an explicit object handed to whatever composes the orchestrator and the
//! tracker; there is no hidden global state here.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Where and how lifecycle events are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkConfig {
    /// Sink target. `console://stdout` prints events; `http(s)://` posts them.
    pub url: String,
    /// Namespace stamped on jobs and datasets.
    pub namespace: String,
    /// Optional bearer credential for HTTP delivery.
    pub api_key: Option<String>,
}

impl SinkConfig {
    /// Namespace used when none is configured.
    pub const DEFAULT_NAMESPACE: &'static str = "stemma";

    /// Environment variable naming the sink target.
    pub const URL_VAR: &'static str = "STEMMA_SINK_URL";
    /// Environment variable overriding the namespace.
    pub const NAMESPACE_VAR: &'static str = "STEMMA_NAMESPACE";
    /// Environment variable supplying the credential.
    pub const API_KEY_VAR: &'static str = "STEMMA_API_KEY";

    /// Create a configuration for the given sink target with the default
    /// namespace and no credential.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
            api_key: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Resolve configuration from environment variables.
    ///
    /// `STEMMA_SINK_URL` is required; `STEMMA_NAMESPACE` defaults to
    /// `stemma`; `STEMMA_API_KEY` is optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = std::env::var(Self::URL_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "url".to_string(),
            })?;

        let namespace = std::env::var(Self::NAMESPACE_VAR)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| Self::DEFAULT_NAMESPACE.to_string());

        let api_key = std::env::var(Self::API_KEY_VAR).ok().filter(|v| !v.is_empty());

        Ok(Self {
            url,
            namespace,
            api_key,
        })
    }

    /// Validate the configuration.
    ///
    /// Checks the fields are well-formed; the transport scheme is checked by
    /// sink construction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "url".to_string(),
            });
        }
        if self.namespace.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "namespace".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
