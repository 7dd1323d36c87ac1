//! Command executor bridge (C5, spec §4.5).

use crate::context::CommandContext;
use rcr_core::{ExecutionError, ExpandedVars, RuntimeCommand};
use rcr_exec::ResourceManager;
use rcr_security::SecurityPolicy;
use std::collections::HashMap;

/// Limit (in characters) for the debug-log stdout preview (spec §9: a
/// configurable default rather than a bare magic constant).
pub const DEFAULT_TRUNCATE_LIMIT: usize = 2000;

/// Start with the group/global allowlist applied to the inherited
/// environment, then overlay `expanded_env` (spec §9's resolved Open
/// Question: command `ExpandedEnv` overlays the allowlisted system
/// environment, not the other way around).
pub fn assemble_environment(allowlist: &[String], expanded_env: &ExpandedVars) -> ExpandedVars {
    let mut env: ExpandedVars = HashMap::new();
    for name in allowlist {
        if let Ok(value) = std::env::var(name) {
            env.insert(name.clone(), value);
        }
    }
    for (key, value) in expanded_env {
        env.insert(key.clone(), value.clone());
    }
    env
}

fn truncate(s: &str, limit: usize) -> String {
    if s.chars().count() <= limit {
        s.to_string()
    } else {
        let head: String = s.chars().take(limit).collect();
        format!("{head}... (truncated)")
    }
}

/// Run one command: assemble its environment, hand off to the resource
/// manager (racing its own deadline when one is set), and log the outcome.
pub async fn execute(
    manager: &dyn ResourceManager,
    command: &RuntimeCommand,
    ctx: &CommandContext,
    allowlist: &[String],
    policy: &SecurityPolicy,
    truncate_limit: usize,
) -> Result<rcr_core::CommandResult, ExecutionError> {
    let env = assemble_environment(allowlist, &command.expanded_env);
    let cwd = command.effective_work_dir.clone();

    let outcome = match ctx.deadline {
        None => {
            manager
                .execute_command(command, env, &cwd, ctx.cancel.clone())
                .await
        }
        Some(duration) => {
            tokio::select! {
                biased;
                result = manager.execute_command(command, env, &cwd, ctx.cancel.clone()) => result,
                () = tokio::time::sleep(duration) => {
                    tracing::warn!(
                        command = %command.name,
                        event = "timeout_exceeded",
                        timeout_seconds = duration.as_secs(),
                        "command exceeded its deadline"
                    );
                    Err(ExecutionError::DeadlineExceeded { command: command.name.clone() })
                }
            }
        }
    };

    match &outcome {
        Ok(result) => {
            let preview = truncate(&result.stdout, truncate_limit);
            tracing::debug!(
                command = %command.name,
                exit_code = result.exit_code,
                stdout = %preview,
                "command completed"
            );
        }
        Err(e) => {
            let sanitized = rcr_security::sanitize_output_for_logging(&e.to_string(), policy);
            tracing::error!(command = %command.name, error = %sanitized, "command execution failed");
        }
    }

    outcome
}
