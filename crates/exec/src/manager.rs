//! Resource manager contract (spec §6).

use async_trait::async_trait;
use rcr_core::{CommandResult, ExecutionError, ExpandedVars, RuntimeCommand, ValidationError};
use std::path::Path;
use tokio_util::sync::CancellationToken;

/// Collaborator that actually spawns subprocesses and checks output paths.
/// The core engine (C5) depends only on this trait, never on
/// `tokio::process` directly, so it can be faked in tests.
#[async_trait]
pub trait ResourceManager: Send + Sync {
    /// Run `command` with the prepared environment and working directory,
    /// honoring `cancel` for both explicit cancellation and the caller's
    /// own deadline tracking.
    async fn execute_command(
        &self,
        command: &RuntimeCommand,
        env: ExpandedVars,
        cwd: &Path,
        cancel: CancellationToken,
    ) -> Result<CommandResult, ExecutionError>;

    /// Confirm a declared output-capture path lies within the group's
    /// workdir boundary (spec §4.4 item 4).
    fn validate_output_path(
        &self,
        output_file: &Path,
        group_work_dir: &Path,
    ) -> Result<(), ValidationError>;
}
