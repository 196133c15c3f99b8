//! Configuration for origin enrichment

use crate::EnrichError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default JSON field holding the address in the lookup response
pub const DEFAULT_ADDRESS_FIELD: &str = "ip";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the origin lookup
///
/// ```toml
/// [enrichment]
/// endpoint = "https://lookup.example.net/?format=json"
/// address_field = "ip"
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    /// Lookup endpoint; enrichment is disabled when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Field of the JSON response holding the address
    #[serde(default = "default_address_field")]
    pub address_field: String,

    /// Network timeout for the single lookup attempt (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_address_field() -> String {
    DEFAULT_ADDRESS_FIELD.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            address_field: default_address_field(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EnrichmentConfig {
    /// Configuration pointing at `endpoint` with default settings
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Get the timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), EnrichError> {
        if self.timeout_secs == 0 {
            return Err(EnrichError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.address_field.is_empty() {
            return Err(EnrichError::Config("address_field cannot be empty".to_string()));
        }
        if let Some(endpoint) = &self.endpoint {
            reqwest::Url::parse(endpoint)
                .map_err(|e| EnrichError::Config(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EnrichmentConfig::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.address_field, "ip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = EnrichmentConfig::with_endpoint("not a url");
        assert!(matches!(config.validate(), Err(EnrichError::Config(_))));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = EnrichmentConfig::with_endpoint("http://localhost:9000");
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_defaults() {
        let config: EnrichmentConfig =
            toml::from_str(r#"endpoint = "http://localhost:9000/lookup""#).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("http://localhost:9000/lookup"));
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
