//! Global cycle counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Number of completed cycles, advanced only by the pace actor.
#[derive(Debug, Clone, Default)]
pub struct TickClock(Arc<AtomicU64>);

impl TickClock {
    /// A clock at tick zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed cycles so far.
    pub fn now(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Count one more cycle and return the new total.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}
