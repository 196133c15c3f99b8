//! Error types for the capture service

use courier_dispatch::DeliveryError;
use courier_enrich::EnrichError;
use courier_store::StoreError;
use thiserror::Error;

/// Errors surfaced while assembling a capture service
///
/// Capturing itself never fails; these only come from configuration and
/// start-up.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Record store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Enrichment client error
    #[error("Enrichment error: {0}")]
    Enrich(#[from] EnrichError),

    /// Delivery dispatcher error
    #[error("Delivery error: {0}")]
    Delivery(#[from] DeliveryError),

    /// I/O error reading or writing configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
