//! Command path resolution (spec §4.4 item 3).

use crate::store::IntegrityStore;
use rcr_core::VerificationError;
use std::path::{Path, PathBuf};

/// Resolve `command` to an absolute path (consulting `search_path` if the
/// command has no directory component) and confirm it against the
/// integrity store.
///
/// Returns the resolved absolute path as a string, which replaces
/// `ExpandedCmd` for the remainder of the command (spec §4.4).
pub fn resolve_path(
    command: &str,
    search_path: &str,
    store: &IntegrityStore,
) -> Result<String, VerificationError> {
    let candidate = if command.contains('/') {
        PathBuf::from(command)
    } else {
        find_on_path(command, search_path).ok_or_else(|| VerificationError::PathResolutionFailed {
            command: command.to_string(),
            cause: format!("'{command}' not found on search path"),
        })?
    };

    let absolute = std::fs::canonicalize(&candidate).map_err(|e| {
        VerificationError::PathResolutionFailed {
            command: command.to_string(),
            cause: e.to_string(),
        }
    })?;

    store.verify_file(&absolute)?;
    Ok(absolute.display().to_string())
}

fn find_on_path(command: &str, search_path: &str) -> Option<PathBuf> {
    std::env::split_paths(search_path)
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
