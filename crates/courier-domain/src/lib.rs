//! Courier Domain Layer
//!
//! Core data model for Courier, the best-effort event capture outbox.
//! Infrastructure crates (storage, enrichment, delivery) depend on the types
//! and traits defined here; this crate performs no I/O of its own.
//!
//! ## Key Concepts
//!
//! - **Record**: One captured event with its fields and metadata
//! - **RecordId**: UUIDv7 identifier (millisecond time prefix + random bits)
//! - **OriginAddress**: `pending` until enrichment settles it exactly once
//! - **RecordCollection**: The insertion-ordered set persisted as a whole
//! - **DurableSlot**: The string-keyed storage seam the store writes through
//!
//! ## Record lifecycle
//!
//! ```text
//! create ──▶ append (persist) ──▶ set origin once (persist) ──▶ immutable
//!                                                        └── bulk clear
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod collection;
pub mod origin;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use collection::RecordCollection;
pub use origin::OriginAddress;
pub use record::{Fields, Record, RecordId};
pub use traits::DurableSlot;
