//! Courier Enrichment Layer
//!
//! Best-effort augmentation of captured records with their origin address.
//!
//! # Architecture
//!
//! [`EnrichmentClient`] wraps an [`OriginLookup`] implementation and turns
//! every failure into [`OriginAddress::Unknown`]. It makes exactly one
//! attempt per record; missing enrichment is a normal outcome.
//!
//! # Lookups
//!
//! - `MockOriginLookup`: Deterministic double for testing
//! - `HttpOriginLookup`: GET against a JSON address-lookup endpoint
//!
//! # Examples
//!
//! ```
//! use courier_enrich::{EnrichmentClient, MockOriginLookup};
//! use courier_domain::OriginAddress;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let client = EnrichmentClient::new(MockOriginLookup::new("203.0.113.5"));
//! assert_eq!(client.resolve_origin().await, OriginAddress::resolved("203.0.113.5"));
//!
//! let failing = EnrichmentClient::new(MockOriginLookup::failing());
//! assert_eq!(failing.resolve_origin().await, OriginAddress::Unknown);
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod http;

use async_trait::async_trait;
use courier_domain::OriginAddress;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;

pub use config::EnrichmentConfig;
pub use http::HttpOriginLookup;

/// Errors that can occur during an origin lookup
#[derive(Error, Debug)]
pub enum EnrichError {
    /// Network or transport failure (including timeouts)
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status
    #[error("Lookup service returned HTTP {0}")]
    Status(u16),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid enrichment configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EnrichError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            EnrichError::InvalidResponse(e.to_string())
        } else {
            EnrichError::Communication(e.to_string())
        }
    }
}

/// A single origin-address lookup
///
/// Implementations make one attempt and report failure through
/// [`EnrichError`]; they never retry.
#[async_trait]
pub trait OriginLookup: Send + Sync {
    /// Resolve the origin address of the current runtime
    async fn lookup(&self) -> Result<String, EnrichError>;
}

/// Best-effort origin resolver used by the capture pipeline
///
/// A client without a lookup is disabled and resolves every record to
/// [`OriginAddress::Unknown`] without network I/O.
#[derive(Clone)]
pub struct EnrichmentClient {
    lookup: Option<Arc<dyn OriginLookup>>,
}

impl EnrichmentClient {
    /// Create a client around a lookup implementation
    pub fn new(lookup: impl OriginLookup + 'static) -> Self {
        Self {
            lookup: Some(Arc::new(lookup)),
        }
    }

    /// Create a client that never performs lookups
    pub fn disabled() -> Self {
        Self { lookup: None }
    }

    /// Build a client from configuration
    ///
    /// Without an endpoint the client is disabled.
    pub fn from_config(config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        config.validate()?;
        match &config.endpoint {
            Some(endpoint) => Ok(Self::new(HttpOriginLookup::from_config(endpoint, config)?)),
            None => Ok(Self::disabled()),
        }
    }

    /// Whether a lookup is configured
    pub fn is_enabled(&self) -> bool {
        self.lookup.is_some()
    }

    /// Resolve the origin address, degrading to `Unknown` on any failure
    pub async fn resolve_origin(&self) -> OriginAddress {
        let Some(lookup) = &self.lookup else {
            tracing::debug!("Enrichment disabled, origin is unknown");
            return OriginAddress::Unknown;
        };

        match lookup.lookup().await {
            Ok(address) => {
                let origin = OriginAddress::resolved(address);
                tracing::debug!(origin = %origin, "Origin resolved");
                origin
            }
            Err(e) => {
                tracing::warn!(error = %e, "Origin lookup failed, using unknown");
                OriginAddress::Unknown
            }
        }
    }
}

impl std::fmt::Debug for EnrichmentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentClient")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Mock origin lookup for deterministic testing
///
/// Returns a fixed address (or a fixed failure) without network calls and
/// counts how often it was asked. Clones share the counter.
#[derive(Debug, Clone)]
pub struct MockOriginLookup {
    response: Option<String>,
    calls: Arc<AtomicUsize>,
}

impl MockOriginLookup {
    /// Lookup that always returns `address`
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            response: Some(address.into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Lookup that always fails
    pub fn failing() -> Self {
        Self {
            response: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of lookups performed
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OriginLookup for MockOriginLookup {
    async fn lookup(&self) -> Result<String, EnrichError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response
            .clone()
            .ok_or_else(|| EnrichError::Communication("Mock lookup failure".to_string()))
    }
}
