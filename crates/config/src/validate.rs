//! Static validation that doesn't require variable expansion.

use crate::ConfigError;
use rcr_core::{RunnerConfig, RESERVED_WORKDIR_VAR};
use std::collections::HashSet;

pub fn validate_config(config: &RunnerConfig) -> Result<(), ConfigError> {
    check_reserved_bindings("global", config.global.vars.keys())?;

    let mut group_names = HashSet::new();
    for group in &config.groups {
        if group.name.trim().is_empty() {
            return Err(ConfigError::EmptyGroupName(group.name.clone()));
        }
        if !group_names.insert(group.name.as_str()) {
            return Err(ConfigError::DuplicateGroupName(group.name.clone()));
        }

        check_reserved_bindings(&format!("group '{}'", group.name), group.vars.keys())?;

        let mut command_names = HashSet::new();
        for command in &group.commands {
            if !command_names.insert(command.name.as_str()) {
                return Err(ConfigError::DuplicateCommandName {
                    group: group.name.clone(),
                    command: command.name.clone(),
                });
            }
            check_reserved_bindings(
                &format!("command '{}' in group '{}'", command.name, group.name),
                command.env.keys(),
            )?;
        }
    }
    Ok(())
}

fn check_reserved_bindings<'a>(
    location: &str,
    keys: impl Iterator<Item = &'a String>,
) -> Result<(), ConfigError> {
    for key in keys {
        if key == RESERVED_WORKDIR_VAR {
            return Err(ConfigError::ReservedNameInBinding {
                location: location.to_string(),
                name: key.clone(),
            });
        }
    }
    Ok(())
}
