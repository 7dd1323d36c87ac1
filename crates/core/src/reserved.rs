//! The one reserved variable name, injected by the orchestrator.

use crate::error::ConfigurationError;

/// Bound to the effective working directory before any command-scope
/// expansion begins. Users may read it via `%{__runner_workdir}`;
/// defining it in any binding block is rejected.
pub const RESERVED_WORKDIR_VAR: &str = "__runner_workdir";

/// Reject a binding block that attempts to define the reserved name.
pub fn reject_reserved_definition(name: &str) -> Result<(), ConfigurationError> {
    if name == RESERVED_WORKDIR_VAR {
        Err(ConfigurationError::ReservedNameDefined {
            name: name.to_string(),
        })
    } else {
        Ok(())
    }
}
