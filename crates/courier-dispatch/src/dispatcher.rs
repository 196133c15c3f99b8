//! Delivery dispatcher
//!
//! Sends a record through the primary channel and, in redundant mode,
//! through staggered backup channels. Every channel runs as its own task and
//! reports its own outcome; the dispatcher never cancels a channel.

use crate::{
    encode_payload, ChannelOutcome, DeliveryChannel, DeliveryConfig, DeliveryEndpoint,
    DeliveryError, DispatchReport, HttpGetChannel, SuccessPolicy,
};
use courier_domain::Record;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};

/// How many channels carry each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchMode {
    /// Primary channel only
    #[default]
    Single,
    /// Primary plus every backup channel
    Redundant,
}

#[derive(Clone)]
struct ScheduledChannel {
    delay: Duration,
    tag: Option<String>,
    channel: Arc<dyn DeliveryChannel>,
}

/// Fans a record out over the configured channels
#[derive(Clone)]
pub struct DeliveryDispatcher {
    endpoint: Option<DeliveryEndpoint>,
    channels: Vec<ScheduledChannel>,
    mode: DispatchMode,
}

impl DeliveryDispatcher {
    /// Dispatcher with a primary channel that starts immediately
    pub fn new(endpoint: DeliveryEndpoint, primary: Arc<dyn DeliveryChannel>) -> Self {
        Self {
            endpoint: Some(endpoint),
            channels: vec![ScheduledChannel {
                delay: Duration::ZERO,
                tag: None,
                channel: primary,
            }],
            mode: DispatchMode::Single,
        }
    }

    /// Dispatcher that sends nothing
    pub fn disabled() -> Self {
        Self {
            endpoint: None,
            channels: Vec::new(),
            mode: DispatchMode::Single,
        }
    }

    /// Add a backup channel starting `delay` after dispatch
    ///
    /// Backup requests carry the channel name in the `channel` parameter.
    pub fn with_backup(mut self, delay: Duration, channel: Arc<dyn DeliveryChannel>) -> Self {
        let tag = channel.name().to_string();
        self.channels.push(ScheduledChannel {
            delay,
            tag: Some(tag),
            channel,
        });
        self
    }

    /// Set the dispatch mode
    pub fn with_mode(mut self, mode: DispatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Build a dispatcher from configuration
    ///
    /// Returns a disabled dispatcher when no endpoint is configured. Backup
    /// channels alternate between requiring a success status and accepting
    /// any response.
    pub fn from_config(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        config.validate()?;

        let Some(url) = &config.endpoint else {
            tracing::info!("No delivery endpoint configured, delivery disabled");
            return Ok(Self::disabled());
        };

        let mut endpoint = DeliveryEndpoint::parse(url)?.with_params(config.params.clone())?;
        if let Some(var) = &config.credential_env {
            let token = std::env::var(var).map_err(|_| {
                DeliveryError::Config(format!("Environment variable '{}' is not set", var))
            })?;
            endpoint = endpoint.with_bearer(token);
        }

        let timeout = config.timeout();
        let primary = HttpGetChannel::new("primary", SuccessPolicy::AnyResponse, timeout)?;
        let mut dispatcher = Self::new(endpoint, Arc::new(primary)).with_mode(config.mode);

        if config.mode == DispatchMode::Redundant {
            for (i, delay) in config.backup_delays().into_iter().enumerate() {
                let policy = if i % 2 == 0 {
                    SuccessPolicy::SuccessStatus
                } else {
                    SuccessPolicy::AnyResponse
                };
                let backup = HttpGetChannel::new(format!("backup-{}", i + 1), policy, timeout)?;
                dispatcher = dispatcher.with_backup(delay, Arc::new(backup));
            }
        }

        tracing::info!(
            mode = ?config.mode,
            channels = dispatcher.active_channels().len(),
            "Delivery enabled"
        );
        Ok(dispatcher)
    }

    /// Whether an endpoint is configured
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some() && !self.channels.is_empty()
    }

    /// Current dispatch mode
    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    /// Names of the channels used for each record, in start order
    pub fn channel_names(&self) -> Vec<String> {
        self.active_channels()
            .iter()
            .map(|c| c.channel.name().to_string())
            .collect()
    }

    fn active_channels(&self) -> &[ScheduledChannel] {
        match self.mode {
            DispatchMode::Single => &self.channels[..self.channels.len().min(1)],
            DispatchMode::Redundant => &self.channels,
        }
    }

    /// Deliver `record` in the background
    pub fn dispatch(&self, record: &Record) -> JoinHandle<DispatchReport> {
        let dispatcher = self.clone();
        let record = record.clone();
        tokio::spawn(async move { dispatcher.deliver(&record).await })
    }

    /// Deliver `record` and wait for every channel to finish
    ///
    /// The payload and timestamp are computed once and shared by all
    /// channels.
    pub async fn deliver(&self, record: &Record) -> DispatchReport {
        let mut report = DispatchReport::new(record.id.clone());

        let Some(endpoint) = &self.endpoint else {
            tracing::debug!(record_id = %record.id, "Delivery disabled, skipping");
            return report;
        };

        let payload = match encode_payload(record) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(record_id = %record.id, "Failed to encode record: {}", e);
                return report;
            }
        };
        let timestamp_ms = chrono::Utc::now().timestamp_millis();

        let mut tasks = JoinSet::new();
        for scheduled in self.active_channels() {
            let request =
                endpoint.request(&record.id, &payload, timestamp_ms, scheduled.tag.as_deref());
            let scheduled = scheduled.clone();
            tasks.spawn(async move {
                if !scheduled.delay.is_zero() {
                    tokio::time::sleep(scheduled.delay).await;
                }
                let result = scheduled.channel.send(&request).await;
                ChannelOutcome {
                    channel: scheduled.channel.name().to_string(),
                    result: result.map_err(|e| e.to_string()),
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    match &outcome.result {
                        Ok(()) => tracing::info!(
                            record_id = %record.id,
                            channel = %outcome.channel,
                            "Record delivered"
                        ),
                        Err(e) => tracing::warn!(
                            record_id = %record.id,
                            channel = %outcome.channel,
                            "Delivery failed: {}",
                            e
                        ),
                    }
                    report.record(outcome);
                }
                Err(e) => tracing::warn!(record_id = %record.id, "Channel task aborted: {}", e),
            }
        }

        tracing::debug!("{}", report.summary());
        report
    }
}

impl std::fmt::Debug for DeliveryDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryDispatcher")
            .field("endpoint", &self.endpoint)
            .field("channels", &self.channel_names())
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockChannel;
    use chrono::Utc;
    use courier_domain::{Fields, RecordId};
    use tokio::time::Instant;

    fn record() -> Record {
        let mut fields = Fields::new();
        fields.insert("event".to_string(), "signup".to_string());
        Record::new(RecordId::new(), Utc::now(), fields, "courier/test".to_string())
    }

    fn endpoint() -> DeliveryEndpoint {
        DeliveryEndpoint::parse("https://collector.example.com/ingest").unwrap()
    }

    fn redundant(
        primary: &MockChannel,
        first: &MockChannel,
        second: &MockChannel,
    ) -> DeliveryDispatcher {
        DeliveryDispatcher::new(endpoint(), Arc::new(primary.clone()))
            .with_backup(Duration::from_millis(500), Arc::new(first.clone()))
            .with_backup(Duration::from_millis(1000), Arc::new(second.clone()))
            .with_mode(DispatchMode::Redundant)
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_surviving_channel_delivers() {
        let primary = MockChannel::failing("primary");
        let first = MockChannel::failing("backup-1");
        let second = MockChannel::succeeding("backup-2");

        let report = redundant(&primary, &first, &second).deliver(&record()).await;

        assert!(report.delivered());
        assert_eq!(report.first_success.as_deref(), Some("backup-2"));
        assert_eq!(report.attempts(), 3);
        assert_eq!(report.outcomes.iter().filter(|o| o.succeeded()).count(), 1);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(first.call_count(), 1);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backups_are_staggered() {
        let primary = MockChannel::succeeding("primary");
        let first = MockChannel::succeeding("backup-1");
        let second = MockChannel::succeeding("backup-2");
        let start = Instant::now();

        let report = redundant(&primary, &first, &second).deliver(&record()).await;

        let primary_at = primary.sent_at()[0] - start;
        let first_at = first.sent_at()[0] - start;
        let second_at = second.sent_at()[0] - start;
        assert!(primary_at < Duration::from_millis(500));
        assert!(first_at >= Duration::from_millis(500));
        assert!(first_at < Duration::from_millis(1000));
        assert!(second_at >= Duration::from_millis(1000));

        // Backups are not cancelled by an earlier success
        assert_eq!(report.attempts(), 3);
        assert_eq!(report.first_success.as_deref(), Some("primary"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_channels_share_payload_and_timestamp() {
        let primary = MockChannel::succeeding("primary");
        let first = MockChannel::succeeding("backup-1");
        let second = MockChannel::succeeding("backup-2");
        let record = record();

        redundant(&primary, &first, &second).deliver(&record).await;

        let requests: Vec<_> = [&primary, &first, &second]
            .iter()
            .map(|c| c.requests()[0].clone())
            .collect();
        let expected = encode_payload(&record).unwrap();
        for request in &requests {
            assert_eq!(request.param("text"), Some(expected.clone()));
            assert_eq!(request.param("t"), requests[0].param("t"));
        }
        assert_eq!(requests[0].param("channel"), None);
        assert_eq!(requests[1].param("channel").as_deref(), Some("backup-1"));
        assert_eq!(requests[2].param("channel").as_deref(), Some("backup-2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_mode_uses_primary_only() {
        let primary = MockChannel::failing("primary");
        let first = MockChannel::succeeding("backup-1");
        let second = MockChannel::succeeding("backup-2");

        let dispatcher = redundant(&primary, &first, &second).with_mode(DispatchMode::Single);
        let report = dispatcher.deliver(&record()).await;

        assert!(!report.delivered());
        assert_eq!(dispatcher.channel_names(), vec!["primary".to_string()]);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(first.call_count(), 0);
        assert_eq!(second.call_count(), 0);
    }

    #[tokio::test]
    async fn test_disabled_sends_nothing() {
        let dispatcher = DeliveryDispatcher::disabled();
        assert!(!dispatcher.is_enabled());

        let report = dispatcher.dispatch(&record()).await.unwrap();
        assert_eq!(report.attempts(), 0);
        assert!(!report.delivered());
    }

    #[test]
    fn test_from_config_without_endpoint_is_disabled() {
        let dispatcher = DeliveryDispatcher::from_config(&DeliveryConfig::default()).unwrap();
        assert!(!dispatcher.is_enabled());
    }

    #[test]
    fn test_from_config_redundant_channels() {
        let config = DeliveryConfig {
            mode: DispatchMode::Redundant,
            ..DeliveryConfig::with_endpoint("https://collector.example.com/ingest")
        };
        let dispatcher = DeliveryDispatcher::from_config(&config).unwrap();
        assert_eq!(
            dispatcher.channel_names(),
            vec!["primary", "backup-1", "backup-2"]
        );
    }

    #[test]
    fn test_from_config_missing_credential_variable() {
        let config = DeliveryConfig {
            credential_env: Some("COURIER_TEST_UNSET_CREDENTIAL".to_string()),
            ..DeliveryConfig::with_endpoint("https://collector.example.com/ingest")
        };
        let result = DeliveryDispatcher::from_config(&config);
        assert!(matches!(result, Err(DeliveryError::Config(_))));
    }
}
