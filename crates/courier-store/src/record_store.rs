//! The record store: in-memory collection mirrored to a durable slot

use crate::StoreError;
use courier_domain::{DurableSlot, OriginAddress, Record, RecordCollection, RecordId};
use std::fmt;

/// Durable, insertion-ordered store of records
///
/// The store is the only owner of the [`RecordCollection`]. Each mutating
/// call updates the in-memory collection and then writes the entire
/// collection to the slot before returning, so a reader never sees a
/// mutation that has not also been handed to the slot.
///
/// Write failures are logged and swallowed; the in-memory collection keeps
/// the mutation and the next successful save carries it to the slot.
pub struct RecordStore<S> {
    slot: S,
    key: String,
    collection: RecordCollection,
}

impl<S> RecordStore<S>
where
    S: DurableSlot,
    S::Error: fmt::Display,
{
    /// Create a store and load the current slot content
    ///
    /// This is the session start-up path.
    pub fn open(slot: S, key: impl Into<String>) -> Self {
        let mut store = Self {
            slot,
            key: key.into(),
            collection: RecordCollection::new(),
        };
        store.load();
        store
    }

    /// Slot key this store reads and writes
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reload the collection from the slot
    ///
    /// A missing key yields an empty collection. Unreadable or unparseable
    /// content is logged and also yields an empty collection.
    pub fn load(&mut self) -> &RecordCollection {
        self.collection = match self.try_load() {
            Ok(collection) => {
                tracing::debug!(key = %self.key, records = collection.len(), "Loaded record collection");
                collection
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to load record collection, starting empty");
                RecordCollection::new()
            }
        };
        &self.collection
    }

    /// Read and parse the slot without touching the in-memory collection
    pub fn try_load(&self) -> Result<RecordCollection, StoreError> {
        let raw = self
            .slot
            .read(&self.key)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        match raw {
            None => Ok(RecordCollection::new()),
            Some(content) => Ok(serde_json::from_str(&content)?),
        }
    }

    /// Write the whole collection to the slot
    ///
    /// Returns `true` if the slot accepted the write. Failures are logged;
    /// the in-memory collection is never rolled back.
    pub fn save(&mut self) -> bool {
        match self.try_save() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %self.key, records = self.collection.len(), error = %e, "Failed to save record collection");
                false
            }
        }
    }

    /// Write the whole collection to the slot, reporting failure
    pub fn try_save(&mut self) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(&self.collection)?;
        self.slot
            .write(&self.key, &serialized)
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Append a record and save
    pub fn append(&mut self, record: Record) {
        tracing::debug!(id = %record.id, "Appending record");
        self.collection.push(record);
        self.save();
    }

    /// Settle the origin of a stored record and save
    ///
    /// Returns `false` without writing when the record does not exist or its
    /// origin was already settled.
    pub fn set_origin(&mut self, id: &RecordId, origin: OriginAddress) -> bool {
        if !self.collection.settle_origin(id, origin) {
            tracing::debug!(id = %id, "Origin not updated (record missing or already settled)");
            return false;
        }
        self.save();
        true
    }

    /// Remove every record and save
    pub fn clear(&mut self) {
        tracing::info!(key = %self.key, records = self.collection.len(), "Clearing record collection");
        self.collection.clear();
        self.save();
    }

    /// Final save at session teardown
    pub fn flush(&mut self) -> bool {
        self.save()
    }

    /// Current in-memory collection
    pub fn records(&self) -> &RecordCollection {
        &self.collection
    }

    /// Look up one record by id
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.collection.get(id)
    }

    /// Borrow the underlying slot
    pub fn slot(&self) -> &S {
        &self.slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemorySlot;
    use chrono::Utc;
    use courier_domain::Fields;

    const KEY: &str = "courier_records";

    fn record(event: &str) -> Record {
        let mut fields = Fields::new();
        fields.insert("event".to_string(), event.to_string());
        Record::new(RecordId::new(), Utc::now(), fields, "test".to_string())
    }

    fn stored_len(slot: &MemorySlot) -> usize {
        let raw = slot.raw(KEY).expect("slot should have been written");
        let parsed: RecordCollection = serde_json::from_str(&raw).unwrap();
        parsed.len()
    }

    #[test]
    fn test_open_missing_key_is_empty() {
        let store = RecordStore::open(MemorySlot::new(), KEY);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_open_corrupt_content_is_empty() {
        let slot = MemorySlot::new();
        slot.put_raw(KEY, "{not json");

        let store = RecordStore::open(slot, KEY);
        assert!(store.records().is_empty());
        assert!(matches!(store.try_load(), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_open_wrong_shape_is_empty() {
        let slot = MemorySlot::new();
        slot.put_raw(KEY, r#"{"id": "not-an-array"}"#);

        let store = RecordStore::open(slot, KEY);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_append_persists_whole_collection() {
        let slot = MemorySlot::new();
        let mut store = RecordStore::open(slot.clone(), KEY);

        store.append(record("a"));
        assert_eq!(stored_len(&slot), 1);

        store.append(record("b"));
        assert_eq!(stored_len(&slot), 2);
        assert_eq!(slot.write_count(), 2);
    }

    #[test]
    fn test_set_origin_once() {
        let slot = MemorySlot::new();
        let mut store = RecordStore::open(slot.clone(), KEY);
        let r = record("a");
        let id = r.id.clone();
        store.append(r);

        assert!(store.set_origin(&id, OriginAddress::resolved("203.0.113.5")));
        assert!(!store.set_origin(&id, OriginAddress::Unknown));
        // The rejected transition does not write
        assert_eq!(slot.write_count(), 2);

        let reopened = RecordStore::open(slot, KEY);
        assert_eq!(
            reopened.get(&id).unwrap().origin_address,
            OriginAddress::resolved("203.0.113.5")
        );
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let slot = MemorySlot::new();
        let mut store = RecordStore::open(slot.clone(), KEY);
        store.append(record("a"));

        slot.set_fail_writes(true);
        store.append(record("b"));

        // In-memory collection keeps the record; the slot still has the old state
        assert_eq!(store.records().len(), 2);
        assert_eq!(stored_len(&slot), 1);

        // The next successful save catches up
        slot.set_fail_writes(false);
        assert!(store.flush());
        assert_eq!(stored_len(&slot), 2);
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let slot = MemorySlot::new();
        let mut store = RecordStore::open(slot.clone(), KEY);
        store.append(record("a"));
        store.append(record("b"));

        store.clear();
        assert!(store.load().is_empty());
        assert_eq!(stored_len(&slot), 0);
    }
}
