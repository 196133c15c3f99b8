//! In-process slot backend

use crate::StoreError;
use courier_domain::DurableSlot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    max_bytes: Option<usize>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory [`DurableSlot`] for tests and ephemeral sessions
///
/// Clones share the same storage, so a test can hand one clone to a
/// [`RecordStore`](crate::RecordStore) and inspect the raw slot through
/// another.
///
/// # Examples
///
/// ```
/// use courier_store::MemorySlot;
/// use courier_domain::DurableSlot;
///
/// let mut slot = MemorySlot::with_quota(8);
/// assert!(slot.write("k", "short").is_ok());
/// assert!(slot.write("k", "far too long").is_err());
/// assert_eq!(slot.raw("k").as_deref(), Some("short"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    inner: Arc<Mutex<Inner>>,
}

impl MemorySlot {
    /// Create an empty slot without a quota
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty slot that rejects values longer than `max_bytes`
    pub fn with_quota(max_bytes: usize) -> Self {
        let slot = Self::new();
        slot.lock().max_bytes = Some(max_bytes);
        slot
    }

    /// Make every subsequent write fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Raw value under `key`
    pub fn raw(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    /// Store a raw value, bypassing quota and failure injection
    pub fn put_raw(&self, key: &str, value: &str) {
        self.lock().values.insert(key.to_string(), value.to_string());
    }

    /// Number of successful writes
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-write; the map is still usable
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DurableSlot for MemorySlot {
    type Error = StoreError;

    fn read(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut inner = self.lock();
        if inner.fail_writes {
            return Err(StoreError::Backend("write rejected".to_string()));
        }
        if let Some(limit) = inner.max_bytes {
            if value.len() > limit {
                return Err(StoreError::QuotaExceeded {
                    needed: value.len(),
                    limit,
                });
            }
        }
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}
