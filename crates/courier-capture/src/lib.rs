//! Courier Capture
//!
//! Turns caller-supplied fields into persisted records and hands them to
//! enrichment and delivery without making the caller wait.
//!
//! # Architecture
//!
//! ```text
//! fields → RecordFactory → RecordStore (persist) → snapshot returned
//!                                  ↓ (background)
//!                    EnrichmentClient → RecordStore (origin) → DeliveryDispatcher
//! ```
//!
//! # Guarantees
//!
//! - **Persistence before dispatch**: a record is in the durable slot before
//!   any network activity for it starts
//! - **Best effort**: storage, enrichment and delivery failures are logged
//!   and recovered; `capture` itself cannot fail
//! - **Single origin transition**: `pending` becomes a resolved address or
//!   `unknown` exactly once
//!
//! # Example Usage
//!
//! ```no_run
//! use courier_capture::{CaptureService, CourierConfig};
//! use courier_domain::Fields;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CourierConfig::from_toml(r#"
//!     [delivery]
//!     endpoint = "https://collector.example.net/ingest"
//! "#)?;
//! let service = CaptureService::from_config(&config)?;
//!
//! let mut fields = Fields::new();
//! fields.insert("event".to_string(), "signup".to_string());
//! let record = service.capture(fields, true);
//! println!("captured {}", record.id);
//!
//! // Session teardown
//! service.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod factory;
mod service;


pub use config::{CaptureSettings, CourierConfig, LoggingConfig, ENDPOINT_ENV};
pub use error::CaptureError;
pub use factory::{default_client_context, RecordFactory};
pub use service::CaptureService;
