//! Book file persistence.
//!
//! # Responsibility
//! - Locate, create, load and save the `.collabbook` file.
//! - Keep file I/O out of the repo and codec.
//!
//! # Invariants
//! - Saves replace the book atomically (temp file + rename in the same directory).
//! - A book that fails to decode is never partially loaded.
//! - No inter-process locking is performed; the last writer wins.

use crate::codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod book_file;

pub use book_file::{find_book, init_book, load_book, save_book, BOOK_FILE_NAME};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Codec {
        path: PathBuf,
        source: CodecError,
    },
    AlreadyInitialized(PathBuf),
    /// No book in `start` or any of its ancestors.
    NotFound {
        start: PathBuf,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Codec { path, source } => {
                write!(f, "corrupted book at `{}`: {source}", path.display())
            }
            Self::AlreadyInitialized(path) => {
                write!(f, "book is already initialized at `{}`", path.display())
            }
            Self::NotFound { start } => write!(
                f,
                "could not find {BOOK_FILE_NAME} in `{}` or any ancestor directory",
                start.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec { source, .. } => Some(source),
            Self::AlreadyInitialized(_) | Self::NotFound { .. } => None,
        }
    }
}
