//! Core domain logic for collabbook.
//! This crate is the single source of truth for item and board invariants.

pub mod codec;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use codec::{decode, encode, CodecError, CodecResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemKind};
pub use repo::id_alloc::IdAllocator;
pub use repo::item_repo::{Repo, RepoError, RepoResult, ARCHIVE_BOARD, DEFAULT_BOARD};
pub use service::overview::{active_overview, boards_overview, BoardSection, Tally};
pub use store::{find_book, init_book, load_book, save_book, StoreError, StoreResult, BOOK_FILE_NAME};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
