//! Delivery channels
//!
//! A channel is one independent transport primitive. Each channel makes a
//! single attempt per request and reports its own terminal outcome.

use crate::{DeliveryError, DeliveryRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A single transport primitive used to reach the collection endpoint
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Channel name, used in logs, reports and the `channel` tag
    fn name(&self) -> &str;

    /// Make one delivery attempt
    async fn send(&self, request: &DeliveryRequest) -> Result<(), DeliveryError>;
}

/// How a channel judges a completed request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessPolicy {
    /// Any HTTP response counts; only transport errors fail
    AnyResponse,
    /// Only a 2xx status counts
    SuccessStatus,
}

/// Channel issuing an HTTP GET for each request
///
/// The response body is never consumed.
pub struct HttpGetChannel {
    name: String,
    client: reqwest::Client,
    policy: SuccessPolicy,
}

impl HttpGetChannel {
    /// Create a channel with its own HTTP client and network timeout
    pub fn new(
        name: impl Into<String>,
        policy: SuccessPolicy,
        timeout: Duration,
    ) -> Result<Self, DeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            name: name.into(),
            client,
            policy,
        })
    }

    /// Success policy of this channel
    pub fn policy(&self) -> SuccessPolicy {
        self.policy
    }
}

#[async_trait]
impl DeliveryChannel for HttpGetChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        let mut builder = self.client.get(request.url.clone());
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();

        match self.policy {
            SuccessPolicy::AnyResponse => Ok(()),
            SuccessPolicy::SuccessStatus if status.is_success() => Ok(()),
            SuccessPolicy::SuccessStatus => Err(DeliveryError::Status(status.as_u16())),
        }
    }
}

/// Mock channel for deterministic testing
///
/// Records every request it receives and the (tokio) instant it was sent.
/// Clones share the recorded history.
#[derive(Debug, Clone)]
pub struct MockChannel {
    name: String,
    succeed: bool,
    sent: Arc<Mutex<Vec<(tokio::time::Instant, DeliveryRequest)>>>,
}

impl MockChannel {
    /// Channel whose every attempt succeeds
    pub fn succeeding(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    /// Channel whose every attempt fails
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    fn new(name: impl Into<String>, succeed: bool) -> Self {
        Self {
            name: name.into(),
            succeed,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Number of attempts made through this channel
    pub fn call_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Requests received, in order
    pub fn requests(&self) -> Vec<DeliveryRequest> {
        self.sent
            .lock()
            .map(|sent| sent.iter().map(|(_, r)| r.clone()).collect())
            .unwrap_or_default()
    }

    /// Instants at which requests were received, in order
    pub fn sent_at(&self) -> Vec<tokio::time::Instant> {
        self.sent
            .lock()
            .map(|sent| sent.iter().map(|(at, _)| *at).collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DeliveryChannel for MockChannel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, request: &DeliveryRequest) -> Result<(), DeliveryError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((tokio::time::Instant::now(), request.clone()));
        }
        if self.succeed {
            Ok(())
        } else {
            Err(DeliveryError::Transport(format!("{} unavailable", self.name)))
        }
    }
}
