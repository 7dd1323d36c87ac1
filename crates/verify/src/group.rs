//! Group-level file verification (spec §4.4 item 1).

use crate::store::IntegrityStore;
use rcr_core::VerificationError;
use std::path::Path;
use std::time::{Duration, Instant};

/// Summary of a group's upfront file verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationReport {
    pub total: usize,
    pub verified: usize,
    pub skipped: usize,
    pub duration: Duration,
}

/// Verify every file associated with a group. Aborts on the first failure,
/// surfacing the failure unchanged (spec §4.4).
pub fn verify_group_files(
    files: &[impl AsRef<Path>],
    store: &IntegrityStore,
) -> Result<VerificationReport, VerificationError> {
    let start = Instant::now();
    let total = files.len();
    let mut verified = 0usize;
    let mut skipped = 0usize;

    for file in files {
        let path = file.as_ref();
        if store.already_verified(path) {
            skipped += 1;
            continue;
        }
        match store.verify_file(path) {
            Ok(()) => verified += 1,
            Err(e) => {
                return Err(VerificationError::GroupVerificationFailed {
                    total,
                    verified,
                    skipped,
                    first_failure: e.to_string(),
                })
            }
        }
    }

    Ok(VerificationReport {
        total,
        verified,
        skipped,
        duration: start.elapsed(),
    })
}
