//! Contract notifications.
//!
//! Handlers buffer events during a transaction. The executor hands them to an
//! [`EventSink`] once the handler succeeds and commits the transaction's
//! writes only if the sink accepted every event. Delivery beyond the sink is
//! best-effort. Listeners that miss an event must read the record again.

use pact_core::SerializationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Topic of every proposal creation.
pub const TOPIC_PROPOSAL_CREATED: &str = "PROPOSAL_CREATED";

/// Topic of a confirmed proposal; the payload carries the revealed preimage.
pub const TOPIC_PROPOSAL_CONFIRMED: &str = "PROPOSAL_CONFIRMED";

/// Topic of an expired proposal.
pub const TOPIC_PROPOSAL_EXPIRED: &str = "PROPOSAL_EXPIRED";

/// Creation topic addressed to the proposal's handler.
pub fn handler_topic(handler: &str) -> String {
    format!("{}_{}", handler, TOPIC_PROPOSAL_CREATED)
}

/// Failures of the notification channel.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NotifyError {
    /// The channel no longer accepts events.
    #[error("notification channel closed")]
    Closed,

    /// The channel refused an event.
    #[error("notification rejected on {topic}: {reason}")]
    Rejected { topic: String, reason: String },
}

/// A notification emitted by a contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Topic listeners subscribe to.
    pub topic: String,
    /// JSON payload.
    pub payload: Vec<u8>,
}

impl Event {
    /// Build an event with a JSON-encoded payload.
    pub fn json<T: Serialize>(
        topic: impl Into<String>,
        payload: &T,
    ) -> Result<Self, SerializationError> {
        let payload = serde_json::to_vec(payload)
            .map_err(|e| SerializationError::EncodeFailed(e.to_string()))?;
        Ok(Self {
            topic: topic.into(),
            payload,
        })
    }

    /// Payload as text, for display.
    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// Payload of creation and expiry notifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalNotice {
    /// The proposal concerned.
    pub proposal_id: String,
}

/// Payload of a confirmation notification.
///
/// Carries the disclosed preimage so a cooperating party can replay it on
/// the other side of a swap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalConfirmed {
    /// The proposal concerned.
    pub proposal_id: String,
    /// The revealed secret.
    #[serde(rename = "preImage")]
    pub pre_image: String,
}

/// Destination for published notifications.
pub trait EventSink {
    /// Publish one event.
    fn emit(&mut self, event: Event) -> Result<(), NotifyError>;
}

/// Sink that keeps every published event in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events published so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Topics published so far, in order.
    pub fn topics(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.topic.as_str()).collect()
    }

    /// Take all events, leaving the log empty.
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Get the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the log is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: Event) -> Result<(), NotifyError> {
        self.events.push(event);
        Ok(())
    }
}
