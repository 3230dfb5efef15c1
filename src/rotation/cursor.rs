use std::sync::atomic::{AtomicUsize, Ordering};

/// Index of the current gear set in sequential mode.
///
/// Always kept in `[0, len)` for the list length it is advanced with.
#[derive(Debug, Default)]
pub struct RotationCursor {
    index: AtomicUsize,
}

impl RotationCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> usize {
        self.index.load(Ordering::Acquire)
    }

    /// Move to the next gear set, wrapping at `len`. Returns the new index.
    pub fn advance(&self, len: usize) -> usize {
        if len == 0 {
            self.index.store(0, Ordering::Release);
            return 0;
        }

        let previous = self
            .index
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i);
        (previous + 1) % len
    }
}
