//! Pre-execution validator glue (C4, spec §4.4).
//!
//! Thin wiring over `rcr-verify`/`rcr-security`: group file verification
//! runs once per group before the command loop starts; the remaining three
//! checks run per command, in the declared order, so a rejection always
//! identifies the earliest thing that went wrong.

use crate::expand::expand;
use rcr_core::{ExpandedVars, RunnerError};
use rcr_exec::ResourceManager;
use rcr_security::{validate_all_environment_vars, validate_command_allowed, SecurityPolicy};
use rcr_verify::{resolve_path, verify_group_files, IntegrityStore, VerificationReport};
use std::path::{Path, PathBuf};

/// Item 1: verify every file the group declares, once, before any command
/// runs. Templates are expanded in group scope.
pub fn verify_group(
    verify_files: &[String],
    group_scope: &ExpandedVars,
    store: &IntegrityStore,
) -> Result<VerificationReport, RunnerError> {
    let resolved = verify_files
        .iter()
        .map(|template| expand(template, &[group_scope]))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(verify_group_files(&resolved, store)?)
}

/// Items 2 and 3: reject a disallowed environment entry before resolving the
/// command's path, then reject a resolved path outside the allowlist.
/// Returns the resolved absolute path, which replaces the command's
/// templated `cmd` for the rest of execution.
pub fn validate_command(
    expanded_env: &ExpandedVars,
    expanded_cmd: &str,
    search_path: &str,
    store: &IntegrityStore,
    policy: &SecurityPolicy,
) -> Result<String, RunnerError> {
    validate_all_environment_vars(expanded_env, policy)?;
    let resolved = resolve_path(expanded_cmd, search_path, store)?;
    validate_command_allowed(&resolved, policy)?;
    Ok(resolved)
}

/// Item 4: when an output-capture path is declared, expand it in command
/// scope and confirm it stays inside the group's working-directory
/// boundary.
pub fn validate_output_path(
    manager: &dyn ResourceManager,
    output_file_template: Option<&str>,
    command_scope: &[&ExpandedVars],
    group_work_dir: &Path,
) -> Result<Option<PathBuf>, RunnerError> {
    match output_file_template {
        None => Ok(None),
        Some(template) => {
            let expanded = expand(template, command_scope)?;
            let path = PathBuf::from(&expanded);
            manager.validate_output_path(&path, group_work_dir)?;
            Ok(Some(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcr_exec::FakeResourceManager;
    use std::collections::HashMap;

    fn scope(pairs: &[(&str, &str)]) -> ExpandedVars {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>()
    }

    #[test]
    fn empty_verify_files_succeeds_trivially() {
        let store = IntegrityStore::empty();
        let report = verify_group(&[], &scope(&[]), &store).unwrap();
        assert_eq!(report.total, 0);
    }

    #[test]
    fn env_rejection_happens_before_path_resolution() {
        let policy = SecurityPolicy::build(&[r"(?i)SECRET=.*".to_string()], &[], &[]).unwrap();
        let store = IntegrityStore::empty();
        let env = scope(&[("SECRET", "x")]);
        let err = validate_command(&env, "does-not-exist", "", &store, &policy).unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Validation(rcr_core::ValidationError::EnvironmentRejected { .. })
        ));
    }

    #[test]
    fn unresolvable_command_is_reported() {
        let policy = SecurityPolicy::default();
        let store = IntegrityStore::empty();
        let err = validate_command(&scope(&[]), "does-not-exist", "/nonexistent", &store, &policy)
            .unwrap_err();
        assert!(matches!(err, RunnerError::Verification(_)));
    }

    #[test]
    fn no_output_file_template_is_a_noop() {
        let manager = FakeResourceManager::new();
        let result = validate_output_path(&manager, None, &[], Path::new("/tmp")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn rejected_output_path_is_reported() {
        let manager = FakeResourceManager::new();
        manager.reject_output_path(PathBuf::from("/tmp/out.log"));
        let command_scope = scope(&[]);
        let err = validate_output_path(
            &manager,
            Some("/tmp/out.log"),
            &[&command_scope],
            Path::new("/tmp"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RunnerError::Validation(rcr_core::ValidationError::OutputPathRejected { .. })
        ));
    }
}
