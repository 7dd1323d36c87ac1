//! In-memory resource manager for deterministic engine tests.

use crate::manager::ResourceManager;
use async_trait::async_trait;
use parking_lot::Mutex;
use rcr_core::{CommandResult, ExecutionError, ExpandedVars, RuntimeCommand, ValidationError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// A scripted outcome for one command name.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Result(CommandResult),
    SpawnFailure(String),
    /// Simulate a timeout: sleeps longer than the caller's deadline so the
    /// select in a real manager (or the fake's own delay, below) loses the
    /// race against cancellation.
    Hang(Duration),
}

/// One recorded `execute_command` invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub name: String,
    pub cwd: PathBuf,
}

#[derive(Default)]
pub struct FakeResourceManager {
    outcomes: Mutex<HashMap<String, FakeOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
    output_boundary_rejections: Mutex<Vec<PathBuf>>,
}

impl FakeResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_outcome(&self, command_name: &str, outcome: FakeOutcome) {
        self.outcomes
            .lock()
            .insert(command_name.to_string(), outcome);
    }

    pub fn reject_output_path(&self, path: PathBuf) {
        self.output_boundary_rejections.lock().push(path);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ResourceManager for FakeResourceManager {
    async fn execute_command(
        &self,
        command: &RuntimeCommand,
        _env: ExpandedVars,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> Result<CommandResult, ExecutionError> {
        self.calls.lock().push(RecordedCall {
            name: command.name.clone(),
            cwd: cwd.to_path_buf(),
        });
        let outcome = self
            .outcomes
            .lock()
            .get(&command.name)
            .cloned()
            .unwrap_or(FakeOutcome::Result(CommandResult {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            }));

        match outcome {
            FakeOutcome::Result(result) => Ok(result),
            FakeOutcome::SpawnFailure(cause) => Err(ExecutionError::SpawnFailed {
                command: command.expanded_cmd.clone(),
                cause,
            }),
            FakeOutcome::Hang(duration) => {
                tokio::select! {
                    () = cancel.cancelled() => {
                        Err(ExecutionError::Cancelled { command: command.name.clone() })
                    }
                    () = tokio::time::sleep(duration) => {
                        Err(ExecutionError::DeadlineExceeded { command: command.name.clone() })
                    }
                }
            }
        }
    }

    fn validate_output_path(
        &self,
        output_file: &Path,
        _group_work_dir: &Path,
    ) -> Result<(), ValidationError> {
        if self
            .output_boundary_rejections
            .lock()
            .iter()
            .any(|p| p == output_file)
        {
            Err(ValidationError::OutputPathRejected {
                path: output_file.display().to_string(),
                reason: "rejected by test fixture".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
