//! Group executor (C6, spec §4.6): the state machine that ties the
//! variable expander, work-directory resolver, command-context factory,
//! pre-execution validator, and command bridge together into one group run.
//!
//! `Init -> Resolving -> Verifying -> (Running command)* -> Success|Error`.
//! Every exit path releases the scratch directory (unless retention was
//! requested) and emits exactly one notification before returning.

use crate::bridge;
use crate::context::{build_command_context, DEFAULT_TIMEOUT_SECONDS};
use crate::expand::{expand, resolve_bindings};
use crate::result_builder::ResultBuilder;
use crate::validate;
use crate::workdir::{resolve_command_work_dir, resolve_group_work_dir};
use rcr_core::{
    ExpandedVars, GlobalSpec, GroupExecutionResult, GroupSpec, RunnerError, RuntimeCommand,
    RESERVED_WORKDIR_VAR,
};
use rcr_exec::ResourceManager;
use rcr_notify::NotificationSink;
use rcr_security::SecurityPolicy;
use rcr_verify::IntegrityStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// One command's resolved identity, as reported by `validate_group` — the
/// same checks `run_verified` performs, minus the bridge call.
#[derive(Debug, Clone)]
pub struct CommandValidation {
    pub name: String,
    pub resolved_cmd: String,
    pub work_dir: PathBuf,
}

/// Result of running §4.1–§4.4's checks against a group without executing
/// any command (spec: the CLI's `validate` subcommand).
#[derive(Debug, Clone)]
pub struct GroupValidationReport {
    pub group: String,
    pub files_verified: usize,
    pub commands: Vec<CommandValidation>,
}

/// Caps the debug-log preview of a command's stdout (spec §9).
pub const DEFAULT_TRUNCATE_LIMIT: usize = bridge::DEFAULT_TRUNCATE_LIMIT;

#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    pub truncate_limit: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            truncate_limit: DEFAULT_TRUNCATE_LIMIT,
        }
    }
}

/// Per-call execution options; neither affects the group's declared
/// semantics, only its observable side effects (spec §4.2, §4.6).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    pub dry_run: bool,
    pub keep_scratch: bool,
}

/// Owns the collaborators a group run needs and nothing else; one instance
/// is reused across groups and processes.
pub struct GroupExecutor {
    manager: Arc<dyn ResourceManager>,
    notifier: Arc<dyn NotificationSink>,
    store: Arc<IntegrityStore>,
    policy: Arc<SecurityPolicy>,
    search_path: String,
    config: ExecutorConfig,
}

impl GroupExecutor {
    pub fn new(
        manager: Arc<dyn ResourceManager>,
        notifier: Arc<dyn NotificationSink>,
        store: Arc<IntegrityStore>,
        policy: Arc<SecurityPolicy>,
        search_path: impl Into<String>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            manager,
            notifier,
            store,
            policy,
            search_path: search_path.into(),
            config,
        }
    }

    /// Run every command in `group` in order, stopping at the first
    /// failure. Always emits exactly one notification, regardless of which
    /// state the run failed in; always returns the original `RunnerError`
    /// to the caller (spec §7).
    pub async fn execute_group(
        &self,
        global: &GlobalSpec,
        group: &GroupSpec,
        cancel: CancellationToken,
        options: ExecuteOptions,
    ) -> Result<GroupExecutionResult, RunnerError> {
        let start = Instant::now();
        let mut builder = ResultBuilder::new(&group.name);

        let outcome = self.run(global, group, &cancel, &options, &mut builder).await;

        let duration = start.elapsed();
        let result = builder.finish(outcome.as_ref().err(), duration);

        if let Err(e) = self.notifier.notify(group, &result, duration).await {
            tracing::warn!(group = %group.name, error = %e, "notification delivery failed");
        }

        match outcome {
            Ok(()) => Ok(result),
            Err(e) => Err(e),
        }
    }

    async fn run(
        &self,
        global: &GlobalSpec,
        group: &GroupSpec,
        cancel: &CancellationToken,
        options: &ExecuteOptions,
        builder: &mut ResultBuilder,
    ) -> Result<(), RunnerError> {
        // Resolving: global bindings never reference group/command vars, so
        // they resolve once, against an empty outer scope.
        let global_vars = resolve_bindings(&global.vars, &ExpandedVars::new())?;
        let group_vars = resolve_bindings(&group.vars, &global_vars)?;

        let mut group_scope = global_vars.clone();
        group_scope.extend(group_vars);

        let (group_work_dir, mut scratch) = resolve_group_work_dir(
            &group.name,
            group.work_dir.as_deref(),
            &group_scope,
            options.dry_run,
        )?;
        if let Some(s) = scratch.as_mut() {
            s.set_retain(options.keep_scratch);
        }

        // Invariant 1: __runner_workdir is bound before any command-scope
        // expansion begins.
        group_scope.insert(
            RESERVED_WORKDIR_VAR.to_string(),
            group_work_dir.display().to_string(),
        );

        let inner = self.run_verified(global, group, &group_scope, &group_work_dir, cancel, builder).await;

        if let Some(s) = scratch.as_mut() {
            if let Err(e) = s.release() {
                tracing::warn!(group = %group.name, error = %e, "failed to release scratch directory");
            }
        }

        inner
    }

    async fn run_verified(
        &self,
        global: &GlobalSpec,
        group: &GroupSpec,
        group_scope: &ExpandedVars,
        group_work_dir: &std::path::Path,
        cancel: &CancellationToken,
        builder: &mut ResultBuilder,
    ) -> Result<(), RunnerError> {
        validate::verify_group(&group.verify_files, group_scope, &self.store)?;

        let allowlist = if !group.allowlist.is_empty() {
            &group.allowlist
        } else {
            &global.allowlist
        };

        for command in &group.commands {
            builder.note_attempted(&command.name);

            let expanded_cmd = expand(&command.cmd, &[group_scope])?;
            let expanded_args = command
                .args
                .iter()
                .map(|a| expand(a, &[group_scope]))
                .collect::<Result<Vec<_>, _>>()?;

            let mut expanded_env = ExpandedVars::new();
            for (name, template) in &command.env {
                expanded_env.insert(name.clone(), expand(template, &[group_scope])?);
            }

            let resolved_cmd = validate::validate_command(
                &expanded_env,
                &expanded_cmd,
                &self.search_path,
                &self.store,
                &self.policy,
            )?;

            let command_work_dir = resolve_command_work_dir(
                &command.name,
                command.work_dir.as_deref(),
                &[group_scope],
                group_work_dir,
            )?;

            let output_file = validate::validate_output_path(
                self.manager.as_ref(),
                command.output_file.as_deref(),
                &[group_scope],
                group_work_dir,
            )?;

            let effective_timeout = command
                .timeout
                .or(global.timeout)
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS);
            // A negative effective timeout is an internal invariant
            // violation: it terminates the process rather than being
            // reported as a group failure.
            let ctx = match build_command_context(cancel, &command.name, effective_timeout) {
                Ok(ctx) => ctx,
                Err(e) => {
                    tracing::error!(command = %command.name, error = %e, "internal invariant violated");
                    std::process::abort();
                }
            };

            let runtime_command = RuntimeCommand {
                name: command.name.clone(),
                expanded_cmd: resolved_cmd,
                expanded_args,
                expanded_env,
                effective_work_dir: command_work_dir,
                effective_timeout,
                output_file: output_file.map(|p| p.display().to_string()),
            };

            let result = bridge::execute(
                self.manager.as_ref(),
                &runtime_command,
                &ctx,
                allowlist,
                &self.policy,
                self.config.truncate_limit,
            )
            .await;
            ctx.release();

            let result = result?;
            builder.record_completed(&command.name, &result, &self.policy);

            if result.exit_code != 0 {
                return Err(RunnerError::Execution(rcr_core::ExecutionError::CommandFailed {
                    command: command.name.clone(),
                    exit_code: result.exit_code,
                }));
            }
        }

        Ok(())
    }

    /// Run resolution, group file verification, and every per-command
    /// check (env, path, allowlist, output boundary) without ever handing
    /// a command to the resource manager. Always uses a virtual scratch
    /// path when no work dir is declared, regardless of caller intent.
    pub async fn validate_group(
        &self,
        global: &GlobalSpec,
        group: &GroupSpec,
    ) -> Result<GroupValidationReport, RunnerError> {
        let global_vars = resolve_bindings(&global.vars, &ExpandedVars::new())?;
        let group_vars = resolve_bindings(&group.vars, &global_vars)?;
        let mut group_scope = global_vars.clone();
        group_scope.extend(group_vars);

        let (group_work_dir, _scratch) =
            resolve_group_work_dir(&group.name, group.work_dir.as_deref(), &group_scope, true)?;
        group_scope.insert(
            RESERVED_WORKDIR_VAR.to_string(),
            group_work_dir.display().to_string(),
        );

        let report = validate::verify_group(&group.verify_files, &group_scope, &self.store)?;

        let mut commands = Vec::with_capacity(group.commands.len());
        for command in &group.commands {
            let expanded_cmd = expand(&command.cmd, &[&group_scope])?;
            let mut expanded_env = ExpandedVars::new();
            for (name, template) in &command.env {
                expanded_env.insert(name.clone(), expand(template, &[&group_scope])?);
            }

            let resolved_cmd = validate::validate_command(
                &expanded_env,
                &expanded_cmd,
                &self.search_path,
                &self.store,
                &self.policy,
            )?;

            let command_work_dir = resolve_command_work_dir(
                &command.name,
                command.work_dir.as_deref(),
                &[&group_scope],
                &group_work_dir,
            )?;

            validate::validate_output_path(
                self.manager.as_ref(),
                command.output_file.as_deref(),
                &[&group_scope],
                &group_work_dir,
            )?;

            commands.push(CommandValidation {
                name: command.name.clone(),
                resolved_cmd,
                work_dir: command_work_dir,
            });
        }

        Ok(GroupValidationReport {
            group: group.name.clone(),
            files_verified: report.verified,
            commands,
        })
    }
}
