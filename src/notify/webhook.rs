//! Error event relay to an external webhook.

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use tokio::task::JoinHandle;

use crate::config::{IngressConfig, WebhookConfig};
use crate::http::error::{EnvelopeMessage, FailureRecord};
use crate::observability::metrics;

/// The three switches that decide whether an error event is relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookGate {
    pub enabled: bool,
    pub target_url: String,
    pub events_enabled: bool,
}

impl WebhookGate {
    pub fn from_config(config: &WebhookConfig) -> Self {
        Self {
            enabled: config.enabled,
            target_url: config.events.errors_webhook.clone(),
            events_enabled: config.events.errors,
        }
    }

    /// Open only when the subsystem is on, a target is set and error events are on.
    pub fn is_open(&self) -> bool {
        self.enabled && !self.target_url.is_empty() && self.events_enabled
    }

    /// Target URL, if the gate is open.
    pub fn target(&self) -> Option<&str> {
        self.is_open().then_some(self.target_url.as_str())
    }
}

/// Payload POSTed to the webhook target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundErrorEvent {
    pub event: &'static str,
    pub data: ErrorEventData,
    pub date_time: String,
    pub api_key: String,
    pub server_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEventData {
    pub error: String,
    pub message: String,
    pub status: u16,
    pub response: EnvelopeMessage<String>,
}

impl OutboundErrorEvent {
    pub fn new(record: &FailureRecord, date_time: String, api_key: &str, server_url: &str) -> Self {
        Self {
            event: "error",
            data: ErrorEventData {
                error: record.error.clone(),
                message: record.message.clone(),
                status: record.status,
                response: EnvelopeMessage {
                    message: record.message.clone(),
                },
            },
            date_time,
            api_key: api_key.to_string(),
            server_url: server_url.to_string(),
        }
    }
}

/// Current wall-clock time at the local offset, ISO-8601 with milliseconds.
pub fn local_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
}

/// Relays failures to the configured webhook as detached tasks.
#[derive(Debug, Clone)]
pub struct ErrorNotifier {
    gate: WebhookGate,
    api_key: String,
    server_url: String,
    client: reqwest::Client,
}

impl ErrorNotifier {
    pub fn new(config: &IngressConfig, client: reqwest::Client) -> Self {
        Self {
            gate: WebhookGate::from_config(&config.webhook),
            api_key: config.authentication.api_key.clone(),
            server_url: config.server.url.clone(),
            client,
        }
    }

    pub fn gate(&self) -> &WebhookGate {
        &self.gate
    }

    pub fn build_event(&self, record: &FailureRecord) -> OutboundErrorEvent {
        OutboundErrorEvent::new(record, local_timestamp(), &self.api_key, &self.server_url)
    }

    /// Log and dispatch an error event if the gate is open.
    ///
    /// Returns the handle of the dispatch task. Nothing awaits it on the
    /// request path; delivery failures are logged and dropped, never retried.
    pub fn notify(&self, record: &FailureRecord, request_id: &str) -> Option<JoinHandle<()>> {
        let target = self.gate.target()?.to_string();
        let event = self.build_event(record);

        tracing::error!(
            request_id = %request_id,
            event = %serde_json::to_string(&event).unwrap_or_default(),
            "Relaying error event"
        );

        let client = self.client.clone();
        Some(tokio::spawn(async move {
            let delivered = deliver(&client, &target, &event).await;
            metrics::record_webhook_dispatch(delivered);
        }))
    }
}

/// POST `event` to `target`. Only a 2xx reply counts as delivered.
async fn deliver(client: &reqwest::Client, target: &str, event: &OutboundErrorEvent) -> bool {
    match client.post(target).json(event).send().await {
        Ok(response) if response.status().is_success() => {
            tracing::debug!(target = %target, status = %response.status(), "Error event delivered");
            true
        }
        Ok(response) => {
            tracing::warn!(target = %target, status = %response.status(), "Error event rejected");
            false
        }
        Err(e) => {
            tracing::warn!(target = %target, error = %e, "Error event delivery failed");
            false
        }
    }
}
