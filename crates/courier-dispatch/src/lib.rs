//! Courier Delivery Dispatcher
//!
//! Sends one captured record to the remote collection endpoint over one or
//! more independent delivery channels.
//!
//! # Overview
//!
//! - **Encoding**: the record is encoded once; every channel sends the same
//!   payload as the `text` query parameter, with a cache-busting `t`
//! - **Primary channel**: sent immediately; success means the transport
//!   completed, the response body is never read
//! - **Backup channels**: redundant mode only, each started after its own
//!   staggered delay and tagged with a `channel` parameter
//! - **Isolation**: each channel runs in its own task and logs its own
//!   failure; no channel is retried and there is no overall timeout
//!
//! # Delivery policy
//!
//! | Mode | Channels | Receiver sees |
//! |------|----------|---------------|
//! | **Single** | primary | at most one request per record |
//! | **Redundant** | primary + backups | possibly several copies of a record |
//!
//! Redundant mode trades exactly-once attempts for delivery probability.
//! The sender does not deduplicate; every payload carries the record id,
//! which a receiver can use as an idempotency key.
//!
//! # Usage
//!
//! ```no_run
//! use courier_dispatch::{DeliveryConfig, DeliveryDispatcher, DispatchMode};
//!
//! # async fn example(record: courier_domain::Record) -> Result<(), Box<dyn std::error::Error>> {
//! let config = DeliveryConfig {
//!     endpoint: Some("https://collector.example.net/ingest".to_string()),
//!     mode: DispatchMode::Redundant,
//!     ..DeliveryConfig::default()
//! };
//! let dispatcher = DeliveryDispatcher::from_config(&config)?;
//!
//! // Fire and forget
//! dispatcher.dispatch(&record);
//!
//! // Or wait for every channel to settle
//! let report = dispatcher.deliver(&record).await;
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [delivery]
//! endpoint = "https://collector.example.net/ingest"
//! mode = "single"
//! backup_delays_ms = [500, 1000]
//! timeout_secs = 30
//! credential_env = "COURIER_DELIVERY_TOKEN"
//!
//! [delivery.params]
//! stream = "events"
//! ```

#![warn(missing_docs)]

mod channel;
mod config;
mod dispatcher;
mod error;
mod payload;
mod report;

pub use channel::{DeliveryChannel, HttpGetChannel, MockChannel, SuccessPolicy};
pub use config::DeliveryConfig;
pub use dispatcher::{DeliveryDispatcher, DispatchMode};
pub use error::DeliveryError;
pub use payload::{encode_payload, DeliveryEndpoint, DeliveryRequest};
pub use report::{ChannelOutcome, DispatchReport};
