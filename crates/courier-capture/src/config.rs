//! Top-level configuration
//!
//! One TOML file with a section per component:
//!
//! ```toml
//! [store]
//! backend = "file"
//! dir = "/var/lib/courier"
//!
//! [enrichment]
//! endpoint = "https://lookup.example.net/?format=json"
//!
//! [delivery]
//! endpoint = "https://collector.example.net/ingest"
//! mode = "single"
//!
//! [capture]
//! expected_fields = ["event", "plan"]
//!
//! [logging]
//! level = "info"
//! ```

use crate::CaptureError;
use courier_dispatch::DeliveryConfig;
use courier_enrich::EnrichmentConfig;
use courier_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding `delivery.endpoint`
pub const ENDPOINT_ENV: &str = "COURIER_DELIVERY_ENDPOINT";

/// Settings for record construction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Keys every record carries, empty when the caller omits them
    #[serde(default)]
    pub expected_fields: Vec<String>,

    /// Client context override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_context: Option<String>,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// Complete Courier configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CourierConfig {
    /// Record store
    #[serde(default)]
    pub store: StoreConfig,

    /// Origin enrichment
    #[serde(default)]
    pub enrichment: EnrichmentConfig,

    /// Delivery
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Record construction
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CourierConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, CaptureError> {
        Ok(toml::from_str(text)?)
    }

    /// Render configuration as TOML text
    pub fn to_toml(&self) -> Result<String, CaptureError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a file, falling back to defaults if it is
    /// missing, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self, CaptureError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_toml(&contents)?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                self.delivery.endpoint = Some(endpoint);
            }
        }
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), CaptureError> {
        self.store.validate()?;
        self.enrichment.validate()?;
        self.delivery.validate()?;
        if self.capture.expected_fields.iter().any(|k| k.is_empty()) {
            return Err(CaptureError::Config(
                "expected_fields must not contain empty keys".to_string(),
            ));
        }
        if self.logging.level.trim().is_empty() {
            return Err(CaptureError::Config("logging.level must not be empty".to_string()));
        }
        Ok(())
    }
}
