//! The ordered set of records persisted as one unit

use crate::{OriginAddress, Record, RecordId};
use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of records
///
/// Serialized as a bare JSON array. The collection exposes no update or
/// delete operations; the only in-place change is the single origin
/// transition, and the only removal is [`RecordCollection::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordCollection(Vec<Record>);

impl RecordCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record at the end
    pub fn push(&mut self, record: Record) {
        self.0.push(record);
    }

    /// Find a record by id
    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.0.iter().find(|r| &r.id == id)
    }

    /// Settle the origin of the record with the given id
    ///
    /// Returns `true` only if a pending record was found and changed.
    pub fn settle_origin(&mut self, id: &RecordId, origin: OriginAddress) -> bool {
        self.0
            .iter_mut()
            .find(|r| &r.id == id)
            .map(|r| r.settle_origin(origin))
            .unwrap_or(false)
    }

    /// Remove every record
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.0.iter()
    }

    /// Borrow the records as a slice
    pub fn as_slice(&self) -> &[Record] {
        &self.0
    }

    /// Most recently appended record
    pub fn last(&self) -> Option<&Record> {
        self.0.last()
    }
}

impl From<Vec<Record>> for RecordCollection {
    fn from(records: Vec<Record>) -> Self {
        Self(records)
    }
}

impl IntoIterator for RecordCollection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::Fields;
    use chrono::Utc;
    use proptest::prelude::*;
    use std::collections::HashSet;

    proptest! {
        /// Property: ids generated within a session never collide
        #[test]
        fn test_generated_ids_are_distinct(n in 1usize..200) {
            let mut collection = RecordCollection::new();
            for _ in 0..n {
                collection.push(Record::new(RecordId::new(), Utc::now(), Fields::new(), String::new()));
            }
            let ids: HashSet<_> = collection.iter().map(|r| r.id.clone()).collect();
            prop_assert_eq!(ids.len(), n);
        }
    }
}
