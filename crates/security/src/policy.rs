//! Pattern-rule configuration for the security validator.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Pattern rules for environment values, command allowlisting, and output
/// redaction. Compiled once at load time so validation itself never fails
/// on regex construction.
#[derive(Clone)]
pub struct SecurityPolicy {
    env_deny: Vec<Regex>,
    command_allow_prefixes: Vec<String>,
    redactions: Vec<(Regex, String)>,
}

impl Default for SecurityPolicy {
    fn default() -> Self {
        // Best-effort: these are constant, compile-time-valid patterns.
        Self::build(&[], &[], &default_redaction_patterns())
            .unwrap_or_else(|_| Self {
                env_deny: Vec::new(),
                command_allow_prefixes: Vec::new(),
                redactions: Vec::new(),
            })
    }
}

fn default_redaction_patterns() -> Vec<String> {
    vec![
        r"(?i)((?:token|password|secret|api[_-]?key)\s*=\s*)\S+".to_string(),
    ]
}

impl SecurityPolicy {
    /// Build a policy from user-supplied pattern strings.
    ///
    /// `env_deny_patterns` match against `NAME=value` env entries.
    /// `command_allow_prefixes` are plain path prefixes (no regex), any one
    /// of which the resolved command path must start with; an empty list
    /// means "no allowlist restriction."
    /// `redaction_patterns` are regexes with one capture group kept and the
    /// remainder of the match replaced with `[REDACTED]`.
    pub fn build(
        env_deny_patterns: &[String],
        command_allow_prefixes: &[String],
        redaction_patterns: &[String],
    ) -> Result<Self, PolicyError> {
        let env_deny = env_deny_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;
        let redactions = redaction_patterns
            .iter()
            .map(|p| compile(p).map(|re| (re, "${1}[REDACTED]".to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            env_deny,
            command_allow_prefixes: command_allow_prefixes.to_vec(),
            redactions,
        })
    }

    pub fn env_deny(&self) -> &[Regex] {
        &self.env_deny
    }

    pub fn command_allow_prefixes(&self) -> &[String] {
        &self.command_allow_prefixes
    }

    pub fn redactions(&self) -> &[(Regex, String)] {
        &self.redactions
    }
}

fn compile(pattern: &str) -> Result<Regex, PolicyError> {
    Regex::new(pattern).map_err(|source| PolicyError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
