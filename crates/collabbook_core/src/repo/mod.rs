//! In-memory repository for items and board membership.
//!
//! # Responsibility
//! - Own the item table, the board index and the id allocator of one book.
//! - Expose every query/mutation callers are allowed to perform.
//!
//! # Invariants
//! - Reserved boards are always present.
//! - Board membership never references a missing item.
//! - Repo-level failures are returned to the caller, never swallowed.

pub mod id_alloc;
pub mod item_repo;
