//! Fully-expanded counterparts of the declarative spec entities.

use std::collections::HashMap;
use std::path::PathBuf;

/// Name → value mapping with unique keys, produced by the variable
/// expander (C1).
pub type ExpandedVars = HashMap<String, String>;

/// Global scope after expansion: just the expanded variable bindings.
/// Global bindings never reference group/command vars, so this never
/// changes once built.
#[derive(Debug, Clone, Default)]
pub struct RuntimeGlobal {
    pub expanded_vars: ExpandedVars,
}

/// Group scope after expansion. `effective_work_dir` is absent until
/// C2's group-level resolution step sets it, at which point
/// `expanded_vars` gains the reserved `__runner_workdir` key (invariant 1).
#[derive(Debug, Clone)]
pub struct RuntimeGroup {
    pub name: String,
    pub expanded_vars: ExpandedVars,
    pub effective_work_dir: Option<PathBuf>,
}

impl RuntimeGroup {
    pub fn new(name: impl Into<String>, expanded_vars: ExpandedVars) -> Self {
        Self {
            name: name.into(),
            expanded_vars,
            effective_work_dir: None,
        }
    }
}

/// Command scope after expansion: the resolved absolute path, ordered
/// arguments, environment overlay, effective working directory, and
/// effective timeout (seconds; `0` = unlimited).
#[derive(Debug, Clone)]
pub struct RuntimeCommand {
    pub name: String,
    pub expanded_cmd: String,
    pub expanded_args: Vec<String>,
    pub expanded_env: ExpandedVars,
    pub effective_work_dir: PathBuf,
    pub effective_timeout: i64,
    pub output_file: Option<String>,
}
