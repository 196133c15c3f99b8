//! Record module - the unit of capture

use crate::OriginAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Caller-supplied event fields, keyed by field name
pub type Fields = BTreeMap<String, String>;

/// Unique identifier for a record based on UUIDv7
///
/// UUIDv7 combines a 48-bit Unix millisecond timestamp with random bits,
/// so ids sort by creation time and cannot be guessed from a sequence.
/// Collision resistance is sized for logging, not for security.
///
/// Stored as the hyphenated text form. Ids read back from a slot are kept
/// verbatim even if they were not produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a new UUIDv7-based RecordId
    ///
    /// # Examples
    ///
    /// ```
    /// use courier_domain::RecordId;
    ///
    /// let a = RecordId::new();
    /// let b = RecordId::new();
    /// assert_ne!(a, b);
    /// assert_eq!(a.as_str().len(), 36);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().to_string())
    }

    /// Wrap an existing id string
    pub fn from_string(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the id text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Millisecond timestamp embedded in a UUIDv7 id
    ///
    /// Returns `None` for ids that are not UUIDv7.
    pub fn timestamp_ms(&self) -> Option<u64> {
        let uuid = uuid::Uuid::parse_str(&self.0).ok()?;
        if uuid.get_version_num() != 7 {
            return None;
        }
        // UUIDv7: top 48 bits are Unix millisecond timestamp
        Some((uuid.as_u128() >> 80) as u64)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A captured event record
///
/// Everything except `origin_address` is fixed at creation. The origin moves
/// from `pending` to a settled value at most once, through
/// [`Record::settle_origin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier
    pub id: RecordId,

    /// Creation time, serialized as RFC 3339
    pub created_at: DateTime<Utc>,

    /// Caller-supplied fields, copied verbatim
    #[serde(default)]
    pub fields: Fields,

    /// Origin address; `pending` until enrichment settles
    pub origin_address: OriginAddress,

    /// Descriptor of the capturing environment
    pub client_context: String,
}

impl Record {
    /// Create a new record with a pending origin
    pub fn new(
        id: RecordId,
        created_at: DateTime<Utc>,
        fields: Fields,
        client_context: String,
    ) -> Self {
        Self {
            id,
            created_at,
            fields,
            origin_address: OriginAddress::Pending,
            client_context,
        }
    }

    /// Look up a field value
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Settle the origin address
    ///
    /// Only a pending origin can be settled, and only to a non-pending value.
    /// Returns `true` if the record changed; later attempts are no-ops.
    pub fn settle_origin(&mut self, origin: OriginAddress) -> bool {
        if !self.origin_address.is_pending() || origin.is_pending() {
            return false;
        }
        self.origin_address = origin;
        true
    }
}
