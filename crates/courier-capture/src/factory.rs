//! Record construction

use chrono::Utc;
use courier_domain::{Fields, Record, RecordId};

/// Default client context: crate version, OS and architecture
pub fn default_client_context() -> String {
    format!(
        "courier/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

/// Builds new records with fresh ids and timestamps
#[derive(Debug, Clone)]
pub struct RecordFactory {
    expected_fields: Vec<String>,
    client_context: String,
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self {
            expected_fields: Vec::new(),
            client_context: default_client_context(),
        }
    }
}

impl RecordFactory {
    /// Factory with no expected fields and the default client context
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys inserted as empty strings when the caller omits them
    pub fn with_expected_fields<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.expected_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Override the client context
    pub fn with_client_context(mut self, context: impl Into<String>) -> Self {
        self.client_context = context.into();
        self
    }

    /// Client context stamped on every record
    pub fn client_context(&self) -> &str {
        &self.client_context
    }

    /// Create a record from caller-supplied fields
    ///
    /// Fields are copied verbatim. The origin starts out pending.
    pub fn create(&self, mut fields: Fields) -> Record {
        for key in &self.expected_fields {
            fields.entry(key.clone()).or_default();
        }
        Record::new(RecordId::new(), Utc::now(), fields, self.client_context.clone())
    }
}
