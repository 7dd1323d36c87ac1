//! The security half of the pre-execution validator (spec §4.4, §6).

use crate::policy::SecurityPolicy;
use rcr_core::{ExpandedVars, ValidationError};

/// Reject any environment entry matching a deny pattern.
///
/// Patterns match against the `NAME=value` form, so a rule can target
/// either the name or the value (or both).
pub fn validate_all_environment_vars(
    env: &ExpandedVars,
    policy: &SecurityPolicy,
) -> Result<(), ValidationError> {
    let mut names: Vec<&String> = env.keys().collect();
    names.sort();
    for name in names {
        let value = &env[name];
        let entry = format!("{name}={value}");
        for pattern in policy.env_deny() {
            if pattern.is_match(&entry) {
                return Err(ValidationError::EnvironmentRejected {
                    name: name.clone(),
                    reason: format!("matches deny pattern `{}`", pattern.as_str()),
                });
            }
        }
    }
    Ok(())
}

/// Reject a resolved command path that doesn't match the allowlist.
///
/// An empty allowlist means "no restriction" — groups that don't opt in
/// to an allowlist aren't newly broken by this check.
pub fn validate_command_allowed(
    resolved_command: &str,
    policy: &SecurityPolicy,
) -> Result<(), ValidationError> {
    let prefixes = policy.command_allow_prefixes();
    if prefixes.is_empty() {
        return Ok(());
    }
    if prefixes.iter().any(|p| resolved_command.starts_with(p)) {
        Ok(())
    } else {
        Err(ValidationError::CommandRejected {
            command: resolved_command.to_string(),
            reason: "not under any allowlisted path prefix".to_string(),
        })
    }
}

/// Redact known secret shapes from a string before it is logged or sent to
/// a notification sink (spec §6, scenario S6).
pub fn sanitize_output_for_logging(input: &str, policy: &SecurityPolicy) -> String {
    let mut out = input.to_string();
    for (pattern, replacement) in policy.redactions() {
        out = pattern.replace_all(&out, replacement.as_str()).into_owned();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> ExpandedVars {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn env_without_deny_match_passes() {
        let policy = SecurityPolicy::default();
        assert!(validate_all_environment_vars(&env(&[("PATH", "/usr/bin")]), &policy).is_ok());
    }

    #[test]
    fn env_matching_deny_pattern_is_rejected() {
        let policy =
            SecurityPolicy::build(&[r"(?i)LD_PRELOAD=.*".to_string()], &[], &[]).unwrap();
        let err =
            validate_all_environment_vars(&env(&[("LD_PRELOAD", "/evil.so")]), &policy).unwrap_err();
        assert!(matches!(err, ValidationError::EnvironmentRejected { .. }));
    }

    #[test]
    fn empty_allowlist_allows_any_command() {
        let policy = SecurityPolicy::default();
        assert!(validate_command_allowed("/opt/whatever/bin", &policy).is_ok());
    }

    #[test]
    fn command_outside_allowlist_is_rejected() {
        let policy =
            SecurityPolicy::build(&[], &["/usr/bin/".to_string()], &[]).unwrap();
        assert!(validate_command_allowed("/usr/bin/echo", &policy).is_ok());
        let err = validate_command_allowed("/tmp/evil", &policy).unwrap_err();
        assert!(matches!(err, ValidationError::CommandRejected { .. }));
    }

    #[yare::parameterized(
        exact_prefix_match   = { "/usr/bin/echo", true },
        other_allowed_prefix = { "/opt/tools/deploy", true },
        outside_both         = { "/tmp/evil", false },
        partial_prefix_only  = { "/usr/binary/fake", false },
    )]
    fn command_against_multi_prefix_allowlist(resolved_command: &str, allowed: bool) {
        let policy = SecurityPolicy::build(
            &[],
            &["/usr/bin/".to_string(), "/opt/tools/".to_string()],
            &[],
        )
        .unwrap();
        assert_eq!(validate_command_allowed(resolved_command, &policy).is_ok(), allowed);
    }

    #[test]
    fn redacts_token_like_values() {
        let policy = SecurityPolicy::default();
        let sanitized = sanitize_output_for_logging("auth failed: token=abc123xyz", &policy);
        assert!(sanitized.contains("[REDACTED]"));
        assert!(!sanitized.contains("abc123xyz"));
    }
}
