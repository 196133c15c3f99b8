//! Origin address of a record and its one-way state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire value of [`OriginAddress::Pending`]
pub const PENDING: &str = "pending";

/// Wire value of [`OriginAddress::Unknown`]
pub const UNKNOWN: &str = "unknown";

/// Origin address of a captured record
///
/// Serialized as a plain string: the two sentinels `"pending"` and
/// `"unknown"`, or the resolved address itself.
///
/// ```text
/// Pending ──▶ Resolved(addr)
///    └──────▶ Unknown
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OriginAddress {
    /// Enrichment has not settled yet
    Pending,

    /// Address reported by the lookup service
    Resolved(String),

    /// Lookup failed or was not configured
    Unknown,
}

impl OriginAddress {
    /// Create a resolved origin
    ///
    /// A value equal to one of the sentinels maps to that sentinel, and an
    /// empty value maps to `Unknown`.
    pub fn resolved(address: impl Into<String>) -> Self {
        Self::from(address.into())
    }

    /// Whether enrichment is still outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self, OriginAddress::Pending)
    }

    /// Whether a concrete address was resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, OriginAddress::Resolved(_))
    }

    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            OriginAddress::Pending => PENDING,
            OriginAddress::Resolved(address) => address,
            OriginAddress::Unknown => UNKNOWN,
        }
    }
}

impl Default for OriginAddress {
    fn default() -> Self {
        OriginAddress::Pending
    }
}

impl From<String> for OriginAddress {
    fn from(value: String) -> Self {
        match value.as_str() {
            PENDING => OriginAddress::Pending,
            UNKNOWN | "" => OriginAddress::Unknown,
            _ => OriginAddress::Resolved(value),
        }
    }
}

impl From<OriginAddress> for String {
    fn from(origin: OriginAddress) -> Self {
        match origin {
            OriginAddress::Resolved(address) => address,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for OriginAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
