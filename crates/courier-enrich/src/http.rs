//! HTTP origin lookup
//!
//! Issues one GET against a JSON address-lookup endpoint and reads the
//! address from a configurable field of the response object.

use crate::{EnrichError, EnrichmentConfig, OriginLookup};
use async_trait::async_trait;
use std::time::Duration;

/// Origin lookup backed by an HTTP JSON endpoint
///
/// # Examples
///
/// ```no_run
/// use courier_enrich::{EnrichmentClient, HttpOriginLookup};
///
/// let lookup = HttpOriginLookup::new("https://lookup.example.net/?format=json").unwrap();
/// let client = EnrichmentClient::new(lookup);
/// ```
pub struct HttpOriginLookup {
    endpoint: String,
    address_field: String,
    client: reqwest::Client,
}

impl HttpOriginLookup {
    /// Create a lookup with the default field and timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self, EnrichError> {
        let endpoint = endpoint.into();
        Self::from_config(&endpoint, &EnrichmentConfig::with_endpoint(endpoint.clone()))
    }

    /// Create a lookup from configuration
    pub fn from_config(endpoint: &str, config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        let client = build_client(config.timeout())?;
        Ok(Self {
            endpoint: endpoint.to_string(),
            address_field: config.address_field.clone(),
            client,
        })
    }

    /// Read the address field from a lookup response
    fn extract_address(&self, body: &serde_json::Value) -> Result<String, EnrichError> {
        let object = body
            .as_object()
            .ok_or_else(|| EnrichError::InvalidResponse("expected a JSON object".to_string()))?;

        match object.get(&self.address_field) {
            Some(serde_json::Value::String(address)) if !address.trim().is_empty() => {
                Ok(address.trim().to_string())
            }
            Some(_) => Err(EnrichError::InvalidResponse(format!(
                "field '{}' is not a non-empty string",
                self.address_field
            ))),
            None => Err(EnrichError::InvalidResponse(format!(
                "missing field '{}'",
                self.address_field
            ))),
        }
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, EnrichError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EnrichError::Config(format!("Failed to build HTTP client: {}", e)))
}

#[async_trait]
impl OriginLookup for HttpOriginLookup {
    async fn lookup(&self) -> Result<String, EnrichError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status(status.as_u16()));
        }

        let body: serde_json::Value = response.json().await?;
        self.extract_address(&body)
    }
}
