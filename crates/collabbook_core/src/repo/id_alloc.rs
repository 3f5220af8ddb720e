//! Monotonic item id source owned by one `Repo`.
//!
//! # Invariants
//! - Ids are handed out in strictly increasing order and never reused.
//! - `advance_past(k)` guarantees the next id is at least `k + 1`.
//! - Once `u64::MAX` has been handed out the allocator is exhausted.

use crate::model::item::ItemId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: ItemId,
    exhausted: bool,
}

impl IdAllocator {
    /// Fresh allocator starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next `allocate` call would return.
    pub fn peek(&self) -> Option<ItemId> {
        (!self.exhausted).then_some(self.next)
    }

    pub fn allocate(&mut self) -> Option<ItemId> {
        let id = self.peek()?;
        match id.checked_add(1) {
            Some(next) => self.next = next,
            None => self.exhausted = true,
        }
        Some(id)
    }

    /// Moves the counter to `max(current, id + 1)`.
    pub fn advance_past(&mut self, id: ItemId) {
        match id.checked_add(1) {
            Some(next) => self.next = self.next.max(next),
            None => self.exhausted = true,
        }
    }
}
