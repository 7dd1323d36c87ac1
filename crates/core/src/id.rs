//! Short-identifier helpers for scratch-directory naming.

use uuid::Uuid;

/// Truncate a string slice to at most `n` characters.
pub trait ShortId {
    fn short(&self, n: usize) -> &str;
}

impl ShortId for str {
    fn short(&self, n: usize) -> &str {
        match self.char_indices().nth(n) {
            Some((byte_idx, _)) => &self[..byte_idx],
            None => self,
        }
    }
}

/// A short random suffix for scratch-directory names (spec §4.2:
/// "a short random suffix").
pub fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string().short(8).to_string()
}
