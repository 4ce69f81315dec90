//! Render window: how many leading chunks are materialized
//!
//! The window only ever grows on a fixed chunk list; it resets to one chunk
//! when the chunk list's identity changes (new document or new chunk size).

use tracing::debug;

/// Count of leading chunks currently materialized into the live layout
///
/// Invariant: `1 <= count <= chunk_count` whenever the chunk list is
/// non-empty. Concurrent growth requests reconcile by taking the maximum
/// requested count; a growth request never decreases the count.
#[derive(Debug, Clone)]
pub struct RenderWindow {
    count: usize,
    chunk_count: usize,
}

impl Default for RenderWindow {
    fn default() -> Self {
        Self {
            count: 1,
            chunk_count: 0,
        }
    }
}

impl RenderWindow {
    pub fn new(chunk_count: usize) -> Self {
        Self {
            count: 1,
            chunk_count,
        }
    }

    /// Reset to a single materialized chunk for a new chunk list
    pub fn reset(&mut self, chunk_count: usize) {
        self.count = 1;
        self.chunk_count = chunk_count;
    }

    /// Grow the window by `by` chunks, capped at the chunk count
    ///
    /// Idempotent once the cap is reached. Returns true if the count
    /// actually changed.
    pub fn grow(&mut self, by: usize) -> bool {
        self.grow_to(self.count.saturating_add(by))
    }

    /// Grow the window so that at least `target` chunks are materialized
    ///
    /// This is the forced jump used by anchor navigation; it bypasses the
    /// sentinel's one-chunk pace. The count never decreases.
    pub fn grow_to(&mut self, target: usize) -> bool {
        let new_count = target.min(self.chunk_count).max(self.count);
        if new_count == self.count {
            return false;
        }
        debug!(from = self.count, to = new_count, "render window grew");
        self.count = new_count;
        true
    }

    /// Number of chunks currently materialized
    pub fn count(&self) -> usize {
        self.count.min(self.chunk_count.max(1))
    }

    /// Whether unmaterialized chunks remain
    pub fn has_more(&self) -> bool {
        self.count() < self.chunk_count
    }
}
