//! Notification result builder (C7, spec §4.7).
//!
//! Accumulates per-command outcomes into a single `GroupExecutionResult`;
//! the orchestrator (C6) is responsible for calling the notification sink
//! with the finished value exactly once per `execute_group` invocation.

use rcr_core::{CommandOutcome, CommandResult, GroupExecutionResult, GroupStatus, RunnerError};
use rcr_security::SecurityPolicy;
use std::time::Duration;

pub struct ResultBuilder {
    group: String,
    commands: Vec<CommandOutcome>,
    last_command: String,
}

impl ResultBuilder {
    pub fn new(group: &str) -> Self {
        Self {
            group: group.to_string(),
            commands: Vec::new(),
            last_command: String::new(),
        }
    }

    /// Mark a command as attempted, before any of its pre-execution checks
    /// run. Gives pre-execution failures (which don't carry a command name
    /// in every `RunnerError` variant, e.g. `EnvironmentRejected`) a correct
    /// `last_command` even though the command never completed.
    pub fn note_attempted(&mut self, name: &str) {
        self.last_command = name.to_string();
    }

    /// Record a command that ran to completion (exit 0 or not).
    pub fn record_completed(&mut self, name: &str, result: &CommandResult, policy: &SecurityPolicy) {
        self.last_command = name.to_string();
        self.commands.push(CommandOutcome {
            name: name.to_string(),
            exit_code: result.exit_code,
            output: result.stdout.clone(),
            stderr: rcr_security::sanitize_output_for_logging(&result.stderr, policy),
        });
    }

    /// Finish the accumulator. `error` is the group's terminating failure,
    /// if any; `None` means the group ran every command successfully.
    pub fn finish(self, error: Option<&RunnerError>, duration: Duration) -> GroupExecutionResult {
        match error {
            None => GroupExecutionResult {
                status: GroupStatus::Success,
                group: self.group,
                last_command: self.last_command,
                exit_code: 0,
                commands: self.commands,
                error_msg: None,
                duration,
            },
            Some(e) => GroupExecutionResult {
                status: GroupStatus::Error,
                group: self.group,
                last_command: e
                    .command_name()
                    .map(|s| s.to_string())
                    .unwrap_or(self.last_command),
                exit_code: e.exit_code(),
                commands: self.commands,
                error_msg: Some(e.to_string()),
                duration,
            },
        }
    }
}
