//! Identity hash generation for nodes that do not carry one on disk.

/// Counter that hands out node identity hashes.
///
/// Each [`Cast`](crate::Cast) owns its own generator, so concurrent loads never
/// share state. Generated hashes are never zero: a zero hash on disk means
/// "unassigned" and would be replaced on the next load.
#[derive(Debug, Clone)]
pub struct HashGenerator {
    next: u64,
}

impl HashGenerator {
    /// Seed used by [`HashGenerator::default`].
    pub const DEFAULT_SEED: u64 = 0x534E_4F44_0000_0001;

    /// Create a generator whose first hash is `seed` (or 1 if `seed` is zero).
    pub const fn with_seed(seed: u64) -> Self {
        Self { next: seed }
    }

    /// Hand out the next hash.
    pub fn next_hash(&mut self) -> u64 {
        if self.next == 0 {
            self.next = 1;
        }
        let hash = self.next;
        self.next = self.next.wrapping_add(1);
        hash
    }

    /// Peek at the hash the next call will return.
    pub fn peek(&self) -> u64 {
        self.next.max(1)
    }
}

impl Default for HashGenerator {
    fn default() -> Self {
        Self::with_seed(Self::DEFAULT_SEED)
    }
}
