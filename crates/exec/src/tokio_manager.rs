//! `tokio::process`-backed resource manager.
//!
//! Pipes stdout/stderr, races the child against a deadline and a
//! cancellation token, and kills the child on either.

use crate::manager::ResourceManager;
use async_trait::async_trait;
use rcr_core::{CommandResult, ExecutionError, ExpandedVars, RuntimeCommand, ValidationError};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default)]
pub struct TokioResourceManager;

impl TokioResourceManager {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceManager for TokioResourceManager {
    async fn execute_command(
        &self,
        command: &RuntimeCommand,
        env: ExpandedVars,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> Result<CommandResult, ExecutionError> {
        let mut cmd = Command::new(&command.expanded_cmd);
        cmd.args(&command.expanded_args)
            .current_dir(cwd)
            .env_clear()
            .envs(&env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| ExecutionError::SpawnFailed {
            command: command.expanded_cmd.clone(),
            cause: e.to_string(),
        })?;

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let _ = child.start_kill();
                let _ = child.wait().await;
                Err(ExecutionError::Cancelled { command: command.name.clone() })
            }
            output = child.wait_with_output() => {
                let output = output.map_err(|e| ExecutionError::SpawnFailed {
                    command: command.expanded_cmd.clone(),
                    cause: e.to_string(),
                })?;
                Ok(CommandResult {
                    exit_code: output.status.code().unwrap_or(-1),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                })
            }
        }
    }

    fn validate_output_path(
        &self,
        output_file: &Path,
        group_work_dir: &Path,
    ) -> Result<(), ValidationError> {
        let absolute = if output_file.is_absolute() {
            output_file.to_path_buf()
        } else {
            group_work_dir.join(output_file)
        };

        // The target file need not exist yet; check its parent boundary.
        let parent_in_bounds = absolute
            .parent()
            .map(|p| lexically_within(p, group_work_dir))
            .unwrap_or(false);

        if lexically_within(&absolute, group_work_dir) || parent_in_bounds {
            Ok(())
        } else {
            Err(ValidationError::OutputPathRejected {
                path: absolute.display().to_string(),
                reason: format!(
                    "outside group workdir boundary {}",
                    group_work_dir.display()
                ),
            })
        }
    }
}

/// Lexical containment check (no filesystem access, so it also works for
/// paths that don't exist yet — e.g. an output file not yet written).
fn lexically_within(path: &Path, boundary: &Path) -> bool {
    let normalize = |p: &Path| -> Vec<std::ffi::OsString> {
        let mut parts = Vec::new();
        for component in p.components() {
            use std::path::Component;
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop();
                }
                other => parts.push(other.as_os_str().to_os_string()),
            }
        }
        parts
    };
    let path_parts = normalize(path);
    let boundary_parts = normalize(boundary);
    path_parts.len() >= boundary_parts.len() && path_parts[..boundary_parts.len()] == boundary_parts[..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcr_core::{ExpandedVars, RuntimeCommand};
    use std::path::PathBuf;

    fn runtime_command(cmd: &str, args: &[&str]) -> RuntimeCommand {
        RuntimeCommand {
            name: "c".to_string(),
            expanded_cmd: cmd.to_string(),
            expanded_args: args.iter().map(|s| s.to_string()).collect(),
            expanded_env: ExpandedVars::new(),
            effective_work_dir: std::env::temp_dir(),
            effective_timeout: 0,
            output_file: None,
        }
    }

    #[tokio::test]
    async fn runs_successful_command() {
        let manager = TokioResourceManager::new();
        let cwd = std::env::temp_dir();
        let result = manager
            .execute_command(
                &runtime_command("/bin/echo", &["hi"]),
                ExpandedVars::new(),
                &cwd,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hi");
    }

    #[tokio::test]
    async fn captures_nonzero_exit() {
        let manager = TokioResourceManager::new();
        let cwd = std::env::temp_dir();
        let result = manager
            .execute_command(
                &runtime_command("/bin/false", &[]),
                ExpandedVars::new(),
                &cwd,
                CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn spawn_failure_is_reported() {
        let manager = TokioResourceManager::new();
        let cwd = std::env::temp_dir();
        let err = manager
            .execute_command(
                &runtime_command("/nonexistent/binary", &[]),
                ExpandedVars::new(),
                &cwd,
                CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::SpawnFailed { .. }));
    }

    #[tokio::test]
    async fn cancellation_is_reported() {
        let manager = TokioResourceManager::new();
        let cwd = std::env::temp_dir();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = manager
            .execute_command(
                &runtime_command("/bin/sleep", &["5"]),
                ExpandedVars::new(),
                &cwd,
                cancel,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Cancelled { .. }));
    }

    #[test]
    fn output_path_inside_workdir_is_accepted() {
        let manager = TokioResourceManager::new();
        let workdir = PathBuf::from("/tmp/group-a");
        assert!(manager
            .validate_output_path(Path::new("out.log"), &workdir)
            .is_ok());
        assert!(manager
            .validate_output_path(Path::new("/tmp/group-a/out.log"), &workdir)
            .is_ok());
    }

    #[test]
    fn output_path_escaping_workdir_is_rejected() {
        let manager = TokioResourceManager::new();
        let workdir = PathBuf::from("/tmp/group-a");
        let err = manager
            .validate_output_path(Path::new("/etc/passwd"), &workdir)
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutputPathRejected { .. }));
        let err = manager
            .validate_output_path(Path::new("../escape.log"), &workdir)
            .unwrap_err();
        assert!(matches!(err, ValidationError::OutputPathRejected { .. }));
    }
}
