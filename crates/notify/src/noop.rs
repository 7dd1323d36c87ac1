//! No-op notification sink, used as a default when no destination is set.

use crate::sink::{NotificationSink, NotifyError};
use async_trait::async_trait;
use rcr_core::{GroupExecutionResult, GroupSpec};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifySink;

impl NoopNotifySink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for NoopNotifySink {
    async fn notify(
        &self,
        _group: &GroupSpec,
        _result: &GroupExecutionResult,
        _duration: Duration,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}
