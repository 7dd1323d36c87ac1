//! Scoped scratch-directory resource (spec §4.2, §9).
//!
//! Acquired at group resolution, released on every exit path unless the
//! caller asked for retention. The release routine is idempotent; the
//! `Drop` impl calls it as a last resort so a panicking exit path still
//! tries to clean up, but callers should call `release()` explicitly so
//! they can observe and log failures.

use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    /// `false` for the dry-run virtual path: no filesystem mutation ever
    /// happened, so release is a no-op.
    real: bool,
    retain: bool,
    released: bool,
}

impl ScratchDir {
    pub fn new(path: PathBuf, real: bool) -> Self {
        Self {
            path,
            real,
            retain: false,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opt out of release on the next (or any subsequent) call.
    pub fn set_retain(&mut self, retain: bool) {
        self.retain = retain;
    }

    pub fn retained(&self) -> bool {
        self.retain
    }

    /// Idempotent: the second and later calls are a no-op returning `Ok`.
    pub fn release(&mut self) -> std::io::Result<()> {
        if self.released || self.retain || !self.real {
            self.released = true;
            return Ok(());
        }
        let result = match std::fs::remove_dir_all(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        };
        self.released = true;
        result
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = self.release();
    }
}
