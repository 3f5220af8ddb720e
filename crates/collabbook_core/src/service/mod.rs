//! Read-side services layered on top of the repo.
//!
//! # Responsibility
//! - Shape repo contents for callers without exposing mutation.

pub mod overview;
