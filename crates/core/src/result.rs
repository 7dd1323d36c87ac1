//! Per-command and per-group execution results (spec §3, §4.7, §6).

use serde::Serialize;
use std::time::Duration;

/// Produced by the command executor bridge (C5).
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// One command's outcome as recorded in the group notification payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CommandOutcome {
    pub name: String,
    pub exit_code: i32,
    pub output: String,
    /// Redacted preview of stderr (spec §6: "stderr is pre-redacted").
    pub stderr: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupStatus {
    Success,
    Error,
}

/// Produced exactly once per `ExecuteGroup` call (spec §3 invariant 3).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GroupExecutionResult {
    pub status: GroupStatus,
    pub group: String,
    pub last_command: String,
    pub exit_code: i32,
    pub commands: Vec<CommandOutcome>,
    pub error_msg: Option<String>,
    #[serde(with = "duration_millis")]
    pub duration: Duration,
}

impl GroupExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.status, GroupStatus::Success)
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(d.as_millis() as i64)
    }
}
