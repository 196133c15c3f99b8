//! Per-record delivery report

use courier_domain::RecordId;

/// Terminal outcome of one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    /// Channel name
    pub channel: String,

    /// `Ok` when the channel reported success, otherwise the failure text
    pub result: Result<(), String>,
}

impl ChannelOutcome {
    /// Whether this channel succeeded
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcome of dispatching one record across its channels
///
/// Outcomes are stored in completion order.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Record that was dispatched
    pub record_id: RecordId,

    /// Channel outcomes, in the order they completed
    pub outcomes: Vec<ChannelOutcome>,

    /// First channel to report success, if any
    pub first_success: Option<String>,
}

impl DispatchReport {
    /// Create an empty report
    pub fn new(record_id: RecordId) -> Self {
        Self {
            record_id,
            outcomes: Vec::new(),
            first_success: None,
        }
    }

    /// Record a channel outcome
    pub fn record(&mut self, outcome: ChannelOutcome) {
        if outcome.succeeded() && self.first_success.is_none() {
            self.first_success = Some(outcome.channel.clone());
        }
        self.outcomes.push(outcome);
    }

    /// Whether at least one channel succeeded
    pub fn delivered(&self) -> bool {
        self.first_success.is_some()
    }

    /// Number of channels that ran to completion
    pub fn attempts(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of channels that failed
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        match &self.first_success {
            Some(channel) => format!(
                "record {} delivered via {} ({} attempts, {} failed)",
                self.record_id,
                channel,
                self.attempts(),
                self.failures()
            ),
            None if self.outcomes.is_empty() => {
                format!("record {} not dispatched", self.record_id)
            }
            None => format!(
                "record {} undelivered ({} attempts failed)",
                self.record_id,
                self.failures()
            ),
        }
    }
}
