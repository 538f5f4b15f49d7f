use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

/// Shared generation counter.
///
/// In-flight work records the epoch it started in. After `advance()`, that
/// work is stale and its result is discarded when it arrives.
#[derive(Clone, Debug)]
pub struct Epoch {
    value: Arc<AtomicU64>,
}

impl Default for Epoch {
    fn default() -> Self {
        Self::new()
    }
}

impl Epoch {
    pub fn new() -> Self {
        Self {
            value: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Get the current epoch value.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }

    /// Advance to the next epoch. Returns the new epoch value.
    pub fn advance(&self) -> u64 {
        self.value.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Check if the given epoch is still current.
    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.current()
    }
}
