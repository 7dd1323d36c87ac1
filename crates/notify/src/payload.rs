//! JSON notification payload (spec §6).

use rcr_core::{GroupExecutionResult, GroupSpec};
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandPayload {
    pub name: String,
    pub exit_code: i32,
    pub output: String,
    pub stderr: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NotifyPayload {
    pub status: &'static str,
    pub group: String,
    pub duration_ms: u128,
    pub exit_code: i32,
    pub commands: Vec<CommandPayload>,
    pub last_command: String,
    pub error_msg: Option<String>,
}

pub fn build_payload(
    _group: &GroupSpec,
    result: &GroupExecutionResult,
    duration: Duration,
) -> NotifyPayload {
    NotifyPayload {
        status: if result.is_success() { "success" } else { "error" },
        group: result.group.clone(),
        duration_ms: duration.as_millis(),
        exit_code: result.exit_code,
        commands: result
            .commands
            .iter()
            .map(|c| CommandPayload {
                name: c.name.clone(),
                exit_code: c.exit_code,
                output: c.output.clone(),
                stderr: c.stderr.clone(),
            })
            .collect(),
        last_command: result.last_command.clone(),
        error_msg: result.error_msg.clone(),
    }
}
