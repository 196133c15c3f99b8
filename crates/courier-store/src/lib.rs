//! Courier Storage Layer
//!
//! Durable persistence for the record collection. The whole collection is
//! serialized as one JSON array and written to a single named slot.
//!
//! # Architecture
//!
//! - [`RecordStore`] owns the in-memory collection and mirrors every
//!   mutation to the slot before returning
//! - [`FileSlot`] keeps one file per key and replaces it atomically
//! - [`MemorySlot`] keeps values in process (tests, ephemeral sessions)
//!
//! Storage failures never reach callers of the best-effort API: a failed
//! read yields an empty collection and a failed write leaves the in-memory
//! collection untouched. Both are logged.
//!
//! # Examples
//!
//! ```
//! use courier_store::{MemorySlot, RecordStore};
//!
//! let mut store = RecordStore::open(MemorySlot::new(), "courier_records");
//! assert!(store.records().is_empty());
//! store.clear();
//! ```

#![warn(missing_docs)]

mod config;
mod file_slot;
mod memory_slot;
mod record_store;

pub use config::{ConfiguredSlot, SlotBackend, StoreConfig};
pub use file_slot::FileSlot;
pub use memory_slot::MemorySlot;
pub use record_store::RecordStore;

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot content could not be parsed as a record collection
    #[error("Corrupt slot content: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Write would exceed the slot's size quota
    #[error("Quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Size of the rejected value
        needed: usize,
        /// Configured limit
        limit: usize,
    },

    /// Key cannot be mapped onto the backend
    #[error("Invalid slot key: {0}")]
    InvalidKey(String),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Invalid store configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
