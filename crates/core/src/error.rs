//! Error taxonomy for the group execution engine.
//!
//! Six classes per spec §7. `InternalError` is a program bug, not a
//! reportable user failure, and is kept separate from `RunnerError` so
//! callers can't accidentally treat it as recoverable.

use thiserror::Error;

/// Undefined variable, cycle, syntax, reserved-name clash, malformed env entry.
/// Surfaces from the variable expander (C1).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("circular reference: {}", names.join(" -> "))]
    CircularReference { names: Vec<String> },

    #[error("syntax error at position {position}: {message}")]
    SyntaxError { position: usize, message: String },

    #[error("reserved variable name cannot be defined: {name}")]
    ReservedNameDefined { name: String },

    #[error("malformed environment entry: {entry}")]
    MalformedEnvEntry { entry: String },
}

/// Workdir expansion failure, scratch creation failure. From C2.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("work directory expansion failed for {command}: {cause}")]
    WorkDirExpansion { command: String, cause: String },

    #[error("group work directory template expanded to an empty path")]
    EmptyWorkDir,

    #[error("failed to create scratch directory: {cause}")]
    ScratchCreationFailed { cause: String },
}

/// Integrity mismatch or path-resolution failure. From C4. Carries totals/counts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("integrity mismatch for {path}: expected {expected}, got {actual}")]
    IntegrityMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("file not found in integrity store: {path}")]
    NotInStore { path: String },

    #[error("failed to resolve command path {command}: {cause}")]
    PathResolutionFailed { command: String, cause: String },

    #[error("{verified}/{total} files verified ({skipped} skipped), first failure: {first_failure}")]
    GroupVerificationFailed {
        total: usize,
        verified: usize,
        skipped: usize,
        first_failure: String,
    },
}

/// Environment pattern rejection, command-allowlist rejection, output-path
/// rejection. From C4/C5.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("environment variable {name} rejected: {reason}")]
    EnvironmentRejected { name: String, reason: String },

    #[error("command {command} rejected: {reason}")]
    CommandRejected { command: String, reason: String },

    #[error("output path {path} rejected: {reason}")]
    OutputPathRejected { path: String, reason: String },
}

/// Non-zero exit (`CommandFailed`), subprocess spawn failure, timeout
/// (`DeadlineExceeded`), cancellation. From C5.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("command {command} exited with code {exit_code}")]
    CommandFailed { command: String, exit_code: i32 },

    #[error("failed to spawn {command}: {cause}")]
    SpawnFailed { command: String, cause: String },

    #[error("command {command} exceeded its deadline")]
    DeadlineExceeded { command: String },

    #[error("command {command} was cancelled")]
    Cancelled { command: String },
}

/// Negative timeout, impossible state transitions. Treated as a program bug;
/// may terminate the process. Never surfaced through `RunnerError`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("negative timeout: {seconds}s")]
    NegativeTimeout { seconds: i64 },

    #[error("impossible state transition: {description}")]
    ImpossibleState { description: String },
}

/// Top-level error returned by `ExecuteGroup` and its collaborators.
///
/// `InternalError` is deliberately not a variant here: it aborts the
/// process rather than being reported as a group failure (spec §7).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RunnerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl RunnerError {
    /// The command name this error is attributed to, when known.
    ///
    /// Used by the notification result builder (C7) to populate
    /// `last_command` / the failing command's identity on pre-execution
    /// failures that never reached C5.
    pub fn command_name(&self) -> Option<&str> {
        match self {
            RunnerError::Resolution(ResolutionError::WorkDirExpansion { command, .. }) => {
                Some(command)
            }
            RunnerError::Verification(VerificationError::PathResolutionFailed {
                command, ..
            }) => Some(command),
            RunnerError::Validation(ValidationError::CommandRejected { command, .. }) => {
                Some(command)
            }
            RunnerError::Execution(ExecutionError::CommandFailed { command, .. })
            | RunnerError::Execution(ExecutionError::SpawnFailed { command, .. })
            | RunnerError::Execution(ExecutionError::DeadlineExceeded { command })
            | RunnerError::Execution(ExecutionError::Cancelled { command }) => Some(command),
            _ => None,
        }
    }

    /// Synthetic exit code for failures that never reached process execution
    /// (spec §7: "exit code ... or synthetic `1` for pre-execution failures").
    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerError::Execution(ExecutionError::CommandFailed { exit_code, .. }) => *exit_code,
            _ => 1,
        }
    }
}
