//! Payload encoding and delivery URL construction

use crate::DeliveryError;
use courier_domain::{Record, RecordId};
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameter carrying the encoded record
pub const TEXT_PARAM: &str = "text";

/// Query parameter carrying the cache-busting timestamp
pub const TIMESTAMP_PARAM: &str = "t";

/// Query parameter naming a backup channel
pub const CHANNEL_PARAM: &str = "channel";

/// Parameter names the dispatcher sets itself
pub const RESERVED_PARAMS: [&str; 3] = [TEXT_PARAM, TIMESTAMP_PARAM, CHANNEL_PARAM];

/// Encode a record into the delivery payload
///
/// The payload is the compact JSON form of the record, identical for every
/// channel.
pub fn encode_payload(record: &Record) -> Result<String, DeliveryError> {
    Ok(serde_json::to_string(record)?)
}

/// The remote collection endpoint, injected from configuration
#[derive(Clone)]
pub struct DeliveryEndpoint {
    base: Url,
    params: BTreeMap<String, String>,
    bearer: Option<String>,
}

impl DeliveryEndpoint {
    /// Parse an endpoint URL
    pub fn parse(url: &str) -> Result<Self, DeliveryError> {
        let base = Url::parse(url)
            .map_err(|e| DeliveryError::Config(format!("Invalid endpoint '{}': {}", url, e)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(DeliveryError::Config(format!(
                "Unsupported endpoint scheme '{}'",
                base.scheme()
            )));
        }
        Ok(Self {
            base,
            params: BTreeMap::new(),
            bearer: None,
        })
    }

    /// Add static query parameters sent with every request
    pub fn with_params(mut self, params: BTreeMap<String, String>) -> Result<Self, DeliveryError> {
        if let Some(reserved) = params.keys().find(|k| RESERVED_PARAMS.contains(&k.as_str())) {
            return Err(DeliveryError::Config(format!(
                "Parameter '{}' is reserved",
                reserved
            )));
        }
        self.params = params;
        Ok(self)
    }

    /// Send `token` as a bearer credential
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Base URL without the generated parameters
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Build the request for one channel
    ///
    /// `timestamp_ms` is the cache-busting value; `channel_tag` is set for
    /// backup channels only.
    pub fn request(
        &self,
        record_id: &RecordId,
        payload: &str,
        timestamp_ms: i64,
        channel_tag: Option<&str>,
    ) -> DeliveryRequest {
        let mut url = self.base.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &self.params {
                query.append_pair(key, value);
            }
            query.append_pair(TEXT_PARAM, payload);
            query.append_pair(TIMESTAMP_PARAM, &timestamp_ms.to_string());
            if let Some(tag) = channel_tag {
                query.append_pair(CHANNEL_PARAM, tag);
            }
        }
        DeliveryRequest {
            record_id: record_id.clone(),
            url,
            bearer: self.bearer.clone(),
        }
    }
}

impl fmt::Debug for DeliveryEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryEndpoint")
            .field("base", &self.base.as_str())
            .field("params", &self.params)
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// One fully built delivery request
#[derive(Clone)]
pub struct DeliveryRequest {
    /// Record being delivered
    pub record_id: RecordId,
    /// Complete URL including payload and timestamp
    pub url: Url,
    /// Optional bearer credential
    pub bearer: Option<String>,
}

impl DeliveryRequest {
    /// Value of a query parameter
    pub fn param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

impl fmt::Debug for DeliveryRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeliveryRequest")
            .field("record_id", &self.record_id)
            .field("url", &self.url.as_str())
            .field("bearer", &self.bearer.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
