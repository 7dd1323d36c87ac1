//! Declarative, immutable configuration entities (spec §3).
//!
//! These are deserialized directly from the config file by `rcr-config`;
//! this crate only owns the shape and in-process invariants, not the
//! file format.

use serde::Deserialize;
use std::collections::HashMap;

/// Global scope: declared timeout, variable bindings, default allowlist.
/// Immutable after load.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct GlobalSpec {
    /// Absent ≡ inherit the runner's built-in default. `0` ≡ unlimited.
    pub timeout: Option<i64>,
    pub vars: HashMap<String, String>,
    pub allowlist: Vec<String>,
}

/// One group: name, optional description, optional work-directory
/// template, variable bindings, env allowlist, ordered commands.
/// Immutable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub work_dir: Option<String>,
    #[serde(default)]
    pub vars: HashMap<String, String>,
    #[serde(default)]
    pub allowlist: Vec<String>,
    /// File templates (expanded in group scope) verified once before the
    /// command loop, in addition to each command's resolved binary.
    #[serde(default)]
    pub verify_files: Vec<String>,
    #[serde(rename = "command", default)]
    pub commands: Vec<CommandSpec>,
}

/// One command: name, path template, argument-vector templates, optional
/// per-command environment entries, optional work-directory template,
/// optional timeout, optional output-capture path template. Immutable.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommandSpec {
    pub name: String,
    pub cmd: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: HashMap<String, String>,
    #[serde(default)]
    pub work_dir: Option<String>,
    /// Absent ≡ inherit group/global. `0` ≡ unlimited. Negative is a
    /// program bug, caught by the command-context factory (C3), not here.
    #[serde(default)]
    pub timeout: Option<i64>,
    #[serde(default)]
    pub output_file: Option<String>,
}

/// A fully loaded configuration: one global scope plus an ordered,
/// name-unique list of groups.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct RunnerConfig {
    pub global: GlobalSpec,
    #[serde(rename = "group")]
    pub groups: Vec<GroupSpec>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            global: GlobalSpec::default(),
            groups: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&GroupSpec> {
        self.groups.iter().find(|g| g.name == name)
    }
}

impl GroupSpec {
    /// Look up a command by name within this group.
    pub fn command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }
}
