//! In-memory notification sink recording calls, for engine tests.

use crate::sink::{NotificationSink, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rcr_core::{GroupExecutionResult, GroupSpec};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct NotifyCall {
    pub group: String,
    pub status: rcr_core::GroupStatus,
    pub duration: Duration,
}

#[derive(Default)]
pub struct FakeNotifySink {
    calls: Mutex<Vec<NotifyCall>>,
}

impl FakeNotifySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl NotificationSink for FakeNotifySink {
    async fn notify(
        &self,
        _group: &GroupSpec,
        result: &GroupExecutionResult,
        duration: Duration,
    ) -> Result<(), NotifyError> {
        self.calls.lock().push(NotifyCall {
            group: result.group.clone(),
            status: result.status,
            duration,
        });
        Ok(())
    }
}
