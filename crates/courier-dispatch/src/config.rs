//! Configuration for record delivery

use crate::{DeliveryError, DispatchMode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Configuration for the delivery dispatcher
///
/// Without an `endpoint` delivery is disabled and records stay local.
///
/// # Examples
///
/// ```
/// use courier_dispatch::{DeliveryConfig, DispatchMode};
///
/// let config = DeliveryConfig::default();
/// assert!(config.endpoint.is_none());
/// assert_eq!(config.mode, DispatchMode::Single);
/// assert_eq!(config.backup_delays_ms, vec![500, 1000]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Operator-owned collection endpoint (http or https)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Single or redundant delivery
    #[serde(default)]
    pub mode: DispatchMode,

    /// Start delays of the backup channels in redundant mode
    #[serde(default = "default_backup_delays")]
    pub backup_delays_ms: Vec<u64>,

    /// Per-request network timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Environment variable holding a bearer token for the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_env: Option<String>,

    /// Static query parameters sent with every request
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

fn default_backup_delays() -> Vec<u64> {
    vec![500, 1000]
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            mode: DispatchMode::default(),
            backup_delays_ms: default_backup_delays(),
            timeout_secs: default_timeout_secs(),
            credential_env: None,
            params: BTreeMap::new(),
        }
    }
}

impl DeliveryConfig {
    /// Configuration delivering to `endpoint` with defaults otherwise
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    /// Whether an endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Network timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backup start delays as Durations
    pub fn backup_delays(&self) -> Vec<Duration> {
        self.backup_delays_ms
            .iter()
            .map(|ms| Duration::from_millis(*ms))
            .collect()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DeliveryError> {
        if self.timeout_secs == 0 {
            return Err(DeliveryError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.mode == DispatchMode::Redundant && self.backup_delays_ms.is_empty() {
            return Err(DeliveryError::Config(
                "redundant mode needs at least one backup delay".to_string(),
            ));
        }
        if let Some(name) = &self.credential_env {
            if name.trim().is_empty() {
                return Err(DeliveryError::Config(
                    "credential_env must name a variable".to_string(),
                ));
            }
        }
        if let Some(endpoint) = &self.endpoint {
            crate::DeliveryEndpoint::parse(endpoint)?.with_params(self.params.clone())?;
        }
        Ok(())
    }
}
