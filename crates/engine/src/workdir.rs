//! Work-directory resolver (C2, spec §4.2).

use crate::expand::expand;
use rcr_core::{ExpandedVars, ResolutionError, ScratchDir};
use std::path::PathBuf;

fn safe_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Group-level resolution (spec §4.2 "Group-level algorithm").
///
/// Returns the effective directory and, when a scratch directory was
/// allocated, the handle that owns its lifecycle.
pub fn resolve_group_work_dir(
    group_name: &str,
    work_dir_template: Option<&str>,
    group_scope: &ExpandedVars,
    dry_run: bool,
) -> Result<(PathBuf, Option<ScratchDir>), ResolutionError> {
    match work_dir_template {
        Some(template) if !template.is_empty() => {
            let expanded = expand(template, &[group_scope]).map_err(|e| {
                ResolutionError::WorkDirExpansion {
                    command: group_name.to_string(),
                    cause: e.to_string(),
                }
            })?;
            if expanded.is_empty() {
                return Err(ResolutionError::EmptyWorkDir);
            }
            Ok((PathBuf::from(expanded), None))
        }
        _ => {
            let suffix = rcr_core::random_suffix();
            let basename = format!("rcr-{}-{suffix}", safe_name(group_name));
            if dry_run {
                let path = PathBuf::from(format!("dryrun-{basename}"));
                Ok((path.clone(), Some(ScratchDir::new(path, false))))
            } else {
                let path = std::env::temp_dir().join(basename);
                std::fs::create_dir_all(&path).map_err(|e| ResolutionError::ScratchCreationFailed {
                    cause: e.to_string(),
                })?;
                Ok((path.clone(), Some(ScratchDir::new(path, true))))
            }
        }
    }
}

/// Command-level resolution (spec §4.2 "Command-level algorithm").
///
/// `command_scope` must already include `__runner_workdir`. Expansion
/// failure is fatal (spec §4.2): the caller must abort the group rather
/// than execute the command.
pub fn resolve_command_work_dir(
    command_name: &str,
    work_dir_template: Option<&str>,
    command_scope: &[&ExpandedVars],
    group_effective_work_dir: &std::path::Path,
) -> Result<PathBuf, ResolutionError> {
    match work_dir_template {
        Some(template) if !template.is_empty() => {
            let expanded = expand(template, command_scope).map_err(|e| {
                ResolutionError::WorkDirExpansion {
                    command: command_name.to_string(),
                    cause: e.to_string(),
                }
            })?;
            Ok(PathBuf::from(expanded))
        }
        _ => Ok(group_effective_work_dir.to_path_buf()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn scope(pairs: &[(&str, &str)]) -> ExpandedVars {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect::<HashMap<_, _>>()
    }

    #[test]
    fn declared_work_dir_is_expanded() {
        let group_scope = scope(&[("project", "app")]);
        let (path, scratch) =
            resolve_group_work_dir("g", Some("/tmp/%{project}"), &group_scope, false).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/app"));
        assert!(scratch.is_none());
    }

    #[test]
    fn undeclared_work_dir_allocates_real_scratch() {
        let group_scope = scope(&[]);
        let (path, scratch) = resolve_group_work_dir("g", None, &group_scope, false).unwrap();
        assert!(scratch.is_some());
        assert!(path.exists());
        std::fs::remove_dir_all(&path).ok();
    }

    #[test]
    fn dry_run_scratch_is_virtual() {
        let group_scope = scope(&[]);
        let (path, scratch) = resolve_group_work_dir("g", None, &group_scope, true).unwrap();
        assert!(path.to_string_lossy().contains("dryrun-"));
        assert!(!path.exists());
        assert!(scratch.is_some());
    }

    #[test]
    fn undefined_reference_in_work_dir_is_fatal() {
        let group_scope = scope(&[]);
        let err = resolve_group_work_dir("g", Some("/tmp/%{missing}"), &group_scope, false)
            .unwrap_err();
        assert!(matches!(err, ResolutionError::WorkDirExpansion { .. }));
    }

    #[test]
    fn command_inherits_group_work_dir_when_undeclared() {
        let group_dir = PathBuf::from("/tmp/group-a");
        let resolved = resolve_command_work_dir("c", None, &[], &group_dir).unwrap();
        assert_eq!(resolved, group_dir);
    }

    #[test]
    fn command_work_dir_sees_reserved_var() {
        let command_scope = scope(&[("__runner_workdir", "/tmp/group-a")]);
        let resolved = resolve_command_work_dir(
            "c",
            Some("%{__runner_workdir}/sub"),
            &[&command_scope],
            &PathBuf::from("/tmp/group-a"),
        )
        .unwrap();
        assert_eq!(resolved, PathBuf::from("/tmp/group-a/sub"));
    }
}
