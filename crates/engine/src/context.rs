//! Command context factory (C3, spec §4.3).

use rcr_core::InternalError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default timeout (seconds) when neither the command nor the global scope
/// declares one (spec §9: "debug-log truncation limit is a magic constant
/// ... requires it be configurable with a default" — the same convention
/// applies to the timeout default).
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 30;

/// A cancellable, optionally deadline-bound execution context for one
/// command.
pub struct CommandContext {
    pub cancel: CancellationToken,
    pub deadline: Option<Duration>,
}

impl CommandContext {
    /// Release the context. Currently a no-op beyond dropping the child
    /// token, kept so every caller releases on every exit path per spec §4.3,
    /// and so future per-command resource cleanup has a single hook.
    pub fn release(self) {}
}

fn current_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string())
}

/// Build a context for one command given its parent cancellation token and
/// effective timeout.
///
/// `timeout == 0` is unlimited: no deadline, and a `SecurityEvent`
/// (`unlimited_execution_start`) is logged. `timeout < 0` is a program bug,
/// rejected with `InternalError` rather than reported as a user failure.
pub fn build_command_context(
    parent: &CancellationToken,
    command_name: &str,
    effective_timeout: i64,
) -> Result<CommandContext, InternalError> {
    if effective_timeout < 0 {
        return Err(InternalError::NegativeTimeout {
            seconds: effective_timeout,
        });
    }

    let cancel = parent.child_token();

    if effective_timeout == 0 {
        tracing::warn!(
            command = command_name,
            event = "unlimited_execution_start",
            user = %current_user(),
            "command running without a deadline"
        );
        Ok(CommandContext { cancel, deadline: None })
    } else {
        Ok(CommandContext {
            cancel,
            deadline: Some(Duration::from_secs(effective_timeout as u64)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_timeout_is_an_internal_error() {
        let parent = CancellationToken::new();
        let err = build_command_context(&parent, "c", -1).unwrap_err();
        assert!(matches!(err, InternalError::NegativeTimeout { seconds: -1 }));
    }

    #[yare::parameterized(
        zero_is_unlimited       = { 0, None },
        one_second              = { 1, Some(Duration::from_secs(1)) },
        thirty_seconds_default  = { 30, Some(Duration::from_secs(30)) },
        large_timeout           = { 3600, Some(Duration::from_secs(3600)) },
    )]
    fn effective_timeout_maps_to_expected_deadline(seconds: i64, expected: Option<Duration>) {
        let parent = CancellationToken::new();
        let ctx = build_command_context(&parent, "c", seconds).unwrap();
        assert_eq!(ctx.deadline, expected);
    }

    #[test]
    fn child_token_is_cancelled_when_parent_is() {
        let parent = CancellationToken::new();
        let ctx = build_command_context(&parent, "c", 0).unwrap();
        parent.cancel();
        assert!(ctx.cancel.is_cancelled());
    }
}
