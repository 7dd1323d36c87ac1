//! `NotificationSink` contract: exactly one call per group run, on every
//! exit path, success or failure.

use async_trait::async_trait;
use rcr_core::{GroupExecutionResult, GroupSpec};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification delivery failed: {0}")]
    DeliveryFailed(String),
}

/// A destination for the group-execution notification.
///
/// Implementations must not panic and should treat delivery failure as
/// best-effort: the caller (C7) already owns the group's true outcome and
/// does not retry or escalate a notify failure into a group failure.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(
        &self,
        group: &GroupSpec,
        result: &GroupExecutionResult,
        duration: Duration,
    ) -> Result<(), NotifyError>;
}
