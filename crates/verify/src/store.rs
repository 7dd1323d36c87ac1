//! Integrity store: an external catalog mapping absolute file paths to
//! known-good content hashes (GLOSSARY).
//!
//! Loaded by scanning a manifest directory for `*.sha256` files in the
//! conventional `sha256sum` output format: `<hex digest>  <path>` per line.

use crate::hash::hash_file;
use parking_lot::Mutex;
use rcr_core::VerificationError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

pub struct IntegrityStore {
    hashes: HashMap<PathBuf, String>,
    /// Paths already confirmed this run; a repeat check is reported as
    /// "skipped" in the group verification report rather than re-hashed.
    verified_cache: Mutex<HashSet<PathBuf>>,
}

impl IntegrityStore {
    pub fn empty() -> Self {
        Self {
            hashes: HashMap::new(),
            verified_cache: Mutex::new(HashSet::new()),
        }
    }

    /// Scan a manifest directory for `*.sha256` files.
    pub fn scan_dir(dir: &Path) -> std::io::Result<Self> {
        let mut hashes = HashMap::new();
        if dir.is_dir() {
            for entry in std::fs::read_dir(dir)? {
                let entry = entry?;
                if entry.path().extension().and_then(|e| e.to_str()) != Some("sha256") {
                    continue;
                }
                let content = std::fs::read_to_string(entry.path())?;
                for line in content.lines() {
                    if let Some((digest, path)) = parse_manifest_line(line) {
                        hashes.insert(PathBuf::from(path), digest.to_lowercase());
                    }
                }
            }
        }
        Ok(Self {
            hashes,
            verified_cache: Mutex::new(HashSet::new()),
        })
    }

    pub fn known_hash(&self, path: &Path) -> Option<&str> {
        self.hashes.get(path).map(|s| s.as_str())
    }

    /// `true` if this exact path was already confirmed earlier in the run.
    pub fn already_verified(&self, path: &Path) -> bool {
        self.verified_cache.lock().contains(path)
    }

    /// Hash the file on disk and compare against the stored digest.
    /// Records the path as verified on success.
    pub fn verify_file(&self, path: &Path) -> Result<(), VerificationError> {
        if self.already_verified(path) {
            return Ok(());
        }
        let expected = self
            .known_hash(path)
            .ok_or_else(|| VerificationError::NotInStore {
                path: path.display().to_string(),
            })?
            .to_string();
        let actual = hash_file(path).map_err(|e| VerificationError::PathResolutionFailed {
            command: path.display().to_string(),
            cause: e.to_string(),
        })?;
        if actual != expected {
            return Err(VerificationError::IntegrityMismatch {
                path: path.display().to_string(),
                expected,
                actual,
            });
        }
        self.verified_cache.lock().insert(path.to_path_buf());
        Ok(())
    }
}

fn parse_manifest_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    // sha256sum format: "<64 hex chars>  <path>" (two spaces, or one
    // space + '*' for binary mode).
    let (digest, rest) = line.split_once(char::is_whitespace)?;
    if digest.len() != 64 || !digest.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let path = rest.trim_start().trim_start_matches('*');
    Some((digest, path))
}
