//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// A durable string-keyed storage slot
///
/// Implemented by the infrastructure layer (courier-store). A write replaces
/// the whole value under the key; implementations must never expose a
/// partially written value to a later read.
pub trait DurableSlot {
    /// Error type for slot operations
    type Error;

    /// Read the value stored under `key`, or `None` if nothing was written
    fn read(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the value stored under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}
