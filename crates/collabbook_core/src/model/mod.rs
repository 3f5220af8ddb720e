//! Domain model for notes and tasks.
//!
//! # Responsibility
//! - Define the item record owned by the repo.
//!
//! # Invariants
//! - Every item is identified by a repo-assigned `ItemId`.
//! - Kind and completion are one sum type, so a note can never read as complete.

pub mod item;
