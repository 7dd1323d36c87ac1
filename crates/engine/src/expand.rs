//! Variable expander (C1, spec §4.1).
//!
//! `%{name}` substitution over a left-to-right scan with an explicit state
//! enum (`Literal | Escape | BraceOpen | Name`, per the design notes) —
//! nested expansion inside braces is never attempted, so one pass suffices.

use rcr_core::{ConfigurationError, ExpandedVars};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    Escape,
    BraceOpen,
    Name,
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Outcome of a single `%{name}` lookup during a scan.
enum Lookup {
    Value(String),
    /// Name is known to exist in the current binding set but has not been
    /// resolved yet this pass (used only by [`resolve_bindings`]'s
    /// fixed-point loop; ordinary scope lookups never produce this).
    Pending,
    Missing,
}

enum ScanOutcome {
    Done(String),
    Pending,
}

fn scan(template: &str, mut lookup: impl FnMut(&str) -> Lookup) -> Result<ScanOutcome, ConfigurationError> {
    let mut state = State::Literal;
    let mut out = String::with_capacity(template.len());
    let mut name = String::new();
    let mut brace_start = 0usize;

    for (pos, ch) in template.char_indices() {
        match state {
            State::Literal => {
                if ch == '%' {
                    state = State::Escape;
                } else {
                    out.push(ch);
                }
            }
            State::Escape => {
                if ch == '{' {
                    state = State::BraceOpen;
                    name.clear();
                    brace_start = pos;
                } else if ch == '%' {
                    out.push('%');
                } else {
                    out.push('%');
                    out.push(ch);
                    state = State::Literal;
                }
            }
            State::BraceOpen => {
                if is_name_start(ch) {
                    name.push(ch);
                    state = State::Name;
                } else {
                    return Err(ConfigurationError::SyntaxError {
                        position: pos,
                        message: "expected a variable name after '%{'".to_string(),
                    });
                }
            }
            State::Name => {
                if ch == '}' {
                    match lookup(&name) {
                        Lookup::Value(v) => {
                            out.push_str(&v);
                            state = State::Literal;
                        }
                        Lookup::Pending => return Ok(ScanOutcome::Pending),
                        Lookup::Missing => {
                            return Err(ConfigurationError::UndefinedVariable { name: name.clone() })
                        }
                    }
                } else if is_name_continue(ch) {
                    name.push(ch);
                } else {
                    return Err(ConfigurationError::SyntaxError {
                        position: pos,
                        message: format!("illegal character '{ch}' in variable name"),
                    });
                }
            }
        }
    }

    match state {
        State::Literal => Ok(ScanOutcome::Done(out)),
        // A trailing lone '%' with nothing following is literal, not an error.
        State::Escape => {
            out.push('%');
            Ok(ScanOutcome::Done(out))
        }
        State::BraceOpen | State::Name => Err(ConfigurationError::SyntaxError {
            position: brace_start,
            message: "unclosed '%{' — missing '}'".to_string(),
        }),
    }
}

/// Expand `template` looking up each `%{name}` in `scopes`, in order
/// (first hit wins). The system environment is never consulted here
/// (spec §4.1).
pub fn expand(template: &str, scopes: &[&ExpandedVars]) -> Result<String, ConfigurationError> {
    let outcome = scan(template, |name| {
        for scope in scopes {
            if let Some(v) = scope.get(name) {
                return Lookup::Value(v.clone());
            }
        }
        Lookup::Missing
    })?;
    match outcome {
        ScanOutcome::Done(s) => Ok(s),
        ScanOutcome::Pending => unreachable!("plain scope lookup never yields Pending"),
    }
}

/// Resolve a binding map (`GlobalSpec.vars` or `GroupSpec.vars`) against
/// itself plus an outer, already-resolved scope (spec §4.1: "resolving
/// bindings").
///
/// Two-pass fixed point: values may reference other names in the same map
/// (resolved first) or names already bound in `outer`; a reference cycle
/// among `raw`'s own names is rejected.
pub fn resolve_bindings(
    raw: &HashMap<String, String>,
    outer: &ExpandedVars,
) -> Result<ExpandedVars, ConfigurationError> {
    let mut resolved: ExpandedVars = HashMap::new();
    let mut pending: Vec<String> = {
        let mut names: Vec<String> = raw.keys().cloned().collect();
        names.sort();
        names
    };

    loop {
        if pending.is_empty() {
            return Ok(resolved);
        }

        let mut still_pending = Vec::new();
        let mut progressed = false;

        for name in &pending {
            let outcome = scan(&raw[name], |ref_name| {
                if let Some(v) = resolved.get(ref_name) {
                    Lookup::Value(v.clone())
                } else if raw.contains_key(ref_name) {
                    Lookup::Pending
                } else if let Some(v) = outer.get(ref_name) {
                    Lookup::Value(v.clone())
                } else {
                    Lookup::Missing
                }
            })?;

            match outcome {
                ScanOutcome::Done(value) => {
                    resolved.insert(name.clone(), value);
                    progressed = true;
                }
                ScanOutcome::Pending => still_pending.push(name.clone()),
            }
        }

        if !progressed {
            return Err(ConfigurationError::CircularReference {
                names: still_pending,
            });
        }
        pending = still_pending;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn text_without_percent_signs_is_never_altered(s in "[ -~&&[^%]]{0,64}") {
            let scope: ExpandedVars = HashMap::new();
            prop_assert_eq!(expand(&s, &[&scope]).unwrap(), s);
        }

        #[test]
        fn expand_never_panics(s in "[ -~]{0,64}") {
            let mut scope: ExpandedVars = HashMap::new();
            scope.insert("a".to_string(), "x".to_string());
            scope.insert("b".to_string(), "y".to_string());
            let _ = expand(&s, &[&scope]);
        }
    }
}
