//! Per-session id allocation
//!
//! Balls and vectors need ids that are unique within one game session. Each
//! session owns its own allocator so concurrently mounted games (or tests
//! running in parallel) never share a counter.

use serde::{Deserialize, Serialize};

/// Monotonic id source owned by a single session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_id: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new id
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// The id the next call to [`IdAllocator::next_id`] will return
    pub fn peek(&self) -> u32 {
        self.next_id
    }
}
