// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Data model and error taxonomy for the safe command runner's group
//! execution engine.

pub mod error;
pub mod id;
pub mod reserved;
pub mod result;
pub mod runtime;
pub mod scratch;
pub mod spec;

pub use error::{
    ConfigurationError, ExecutionError, InternalError, ResolutionError, RunnerError,
    ValidationError, VerificationError,
};
pub use id::{random_suffix, ShortId};
pub use reserved::{reject_reserved_definition, RESERVED_WORKDIR_VAR};
pub use result::{CommandOutcome, CommandResult, GroupExecutionResult, GroupStatus};
pub use runtime::{ExpandedVars, RuntimeCommand, RuntimeGlobal, RuntimeGroup};
pub use scratch::ScratchDir;
pub use spec::{CommandSpec, GlobalSpec, GroupSpec, RunnerConfig};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support {
    //! Builders for tests in other crates.
    use crate::spec::{CommandSpec, GroupSpec};
    use std::collections::HashMap;

    pub fn command(name: &str, cmd: &str, args: &[&str]) -> CommandSpec {
        CommandSpec {
            name: name.to_string(),
            cmd: cmd.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            env: HashMap::new(),
            work_dir: None,
            timeout: None,
            output_file: None,
        }
    }

    pub fn group(name: &str, commands: Vec<CommandSpec>) -> GroupSpec {
        GroupSpec {
            name: name.to_string(),
            description: None,
            work_dir: None,
            vars: HashMap::new(),
            allowlist: Vec::new(),
            verify_files: Vec::new(),
            commands,
        }
    }
}
