//! HTTP webhook notification sink.
//!
//! An optionally-configured destination that is a silent no-op when unset,
//! and never lets delivery failure propagate as a group failure.

use crate::payload::build_payload;
use crate::sink::{NotificationSink, NotifyError};
use async_trait::async_trait;
use rcr_core::{GroupExecutionResult, GroupSpec};
use std::time::Duration;

#[derive(Clone)]
pub struct WebhookNotifySink {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookNotifySink {
    pub fn new(url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifySink {
    async fn notify(
        &self,
        group: &GroupSpec,
        result: &GroupExecutionResult,
        duration: Duration,
    ) -> Result<(), NotifyError> {
        let Some(url) = &self.url else {
            return Ok(());
        };

        let payload = build_payload(group, result, duration);

        match self.client.post(url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(group = %group.name, "webhook notification delivered");
                Ok(())
            }
            Ok(response) => {
                let status = response.status();
                tracing::warn!(group = %group.name, %status, "webhook responded with non-success status");
                Err(NotifyError::DeliveryFailed(format!(
                    "webhook returned status {status}"
                )))
            }
            Err(e) => {
                tracing::warn!(group = %group.name, error = %e, "webhook delivery failed");
                Err(NotifyError::DeliveryFailed(e.to_string()))
            }
        }
    }
}
