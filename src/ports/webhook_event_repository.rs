//! Webhook event log port.
//!
//! The processor may deliver the same event more than once: after a
//! timeout, after a 5xx from us, or when our 2xx was lost. Every event that
//! was applied or deliberately ignored is recorded here so a redelivery is
//! acknowledged without being applied twice. Failures are not recorded,
//! which lets a redelivery re-run them.

use async_trait::async_trait;
use std::fmt;

use crate::domain::foundation::{DomainError, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    Success,
    /// Acknowledged without a state change; `reason` says why.
    Ignored,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Success => "success",
            WebhookOutcome::Ignored => "ignored",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "success" => Some(WebhookOutcome::Success),
            "ignored" => Some(WebhookOutcome::Ignored),
            _ => None,
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebhookEventRecord {
    /// `evt_...`
    pub event_id: String,
    pub event_type: String,
    pub processed_at: Timestamp,
    pub outcome: WebhookOutcome,
    pub reason: Option<String>,
    /// Original event payload, kept for auditing.
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    pub fn success(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Timestamp::now(),
            outcome: WebhookOutcome::Success,
            reason: None,
            payload,
        }
    }

    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Timestamp::now(),
            outcome: WebhookOutcome::Ignored,
            reason: Some(reason.into()),
            payload,
        }
    }
}

/// Result of attempting to save a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First time seeing this event.
    Inserted,
    /// Another delivery recorded it first.
    AlreadyExists,
}

/// Result of webhook processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookResult {
    Processed,
    Ignored,
    /// Seen before; acknowledged without re-applying.
    AlreadyProcessed,
}

#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    async fn find_by_event_id(&self, event_id: &str) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Insert with `ON CONFLICT DO NOTHING` semantics.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;
}
