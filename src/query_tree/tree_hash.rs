use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub type TreeHash = u64;

/// Accumulator for tree hashes.
///
/// `DefaultHasher::new()` uses fixed keys, so the same tree hashes to the same
/// value on every run of a given build.
#[derive(Debug, Clone)]
pub struct TreeHashState {
    hasher: DefaultHasher,
}

impl Default for TreeHashState {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeHashState {
    pub fn new() -> Self {
        Self { hasher: DefaultHasher::new() }
    }

    pub fn update<T: Hash + ?Sized>(&mut self, value: &T) {
        value.hash(&mut self.hasher);
    }

    /// Length prefixed, so `("ab", "c")` and `("a", "bc")` differ.
    pub fn update_str(&mut self, value: &str) {
        self.hasher.write_usize(value.len());
        self.hasher.write(value.as_bytes());
    }

    pub fn finish(&self) -> TreeHash {
        self.hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_hash_is_deterministic() {
        let mut a = TreeHashState::new();
        let mut b = TreeHashState::new();
        a.update_str("id");
        a.update(&42u64);
        b.update_str("id");
        b.update(&42u64);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    pub fn test_hash_string_boundaries() {
        let mut a = TreeHashState::new();
        let mut b = TreeHashState::new();
        a.update_str("ab");
        a.update_str("c");
        b.update_str("a");
        b.update_str("bc");
        assert_ne!(a.finish(), b.finish());
    }
}
