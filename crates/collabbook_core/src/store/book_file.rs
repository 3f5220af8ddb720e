//! `.collabbook` file discovery and load/save utilities.
//!
//! # Invariants
//! - `init_book` never overwrites an existing book.
//! - `save_book` leaves either the old or the new document on disk, never a truncated one.

use super::{StoreError, StoreResult};
use crate::codec::{decode, encode};
use crate::repo::item_repo::Repo;
use log::{error, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// File name of a book inside its directory.
pub const BOOK_FILE_NAME: &str = ".collabbook";

/// Finds the nearest book in `start` or any ancestor of it.
///
/// Only regular files count; symlinks and directories named
/// `.collabbook` are skipped. The walk stops early at a directory that
/// cannot be inspected.
pub fn find_book(start: impl AsRef<Path>) -> StoreResult<PathBuf> {
    let start = start.as_ref();
    for (depth, dir) in start.ancestors().enumerate() {
        let candidate = dir.join(BOOK_FILE_NAME);
        match fs::symlink_metadata(&candidate) {
            Ok(meta) if meta.file_type().is_file() => {
                info!("event=book_find module=store status=ok depth={depth}");
                return Ok(candidate);
            }
            Ok(_) => continue,
            Err(err) if err.kind() == ErrorKind::NotFound => continue,
            Err(err) if err.kind() == ErrorKind::PermissionDenied => {
                warn!(
                    "event=book_find module=store status=stopped depth={depth} error_code=permission_denied"
                );
                break;
            }
            Err(err) => return Err(io_error(&candidate, err)),
        }
    }
    info!("event=book_find module=store status=not_found");
    Err(StoreError::NotFound {
        start: start.to_path_buf(),
    })
}

/// Creates `dir/.collabbook` holding an empty book.
///
/// # Errors
/// - `AlreadyInitialized` when the file already exists.
/// - `Io` when the file cannot be created or written; a partially written
///   file is removed again.
pub fn init_book(dir: impl AsRef<Path>) -> StoreResult<PathBuf> {
    let path = dir.as_ref().join(BOOK_FILE_NAME);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|err| {
            if err.kind() == ErrorKind::AlreadyExists {
                StoreError::AlreadyInitialized(path.clone())
            } else {
                io_error(&path, err)
            }
        })?;

    let text = encode(&Repo::new());
    let written = file
        .write_all(text.as_bytes())
        .and_then(|()| file.sync_all());
    if let Err(err) = written {
        drop(file);
        if let Err(cleanup) = fs::remove_file(&path) {
            error!(
                "event=book_init module=store status=error error_code=cleanup_failed error={cleanup}"
            );
        }
        error!("event=book_init module=store status=error error_code=write_failed error={err}");
        return Err(io_error(&path, err));
    }

    info!("event=book_init module=store status=ok");
    Ok(path)
}

/// Reads and decodes the book at `path`.
pub fn load_book(path: impl AsRef<Path>) -> StoreResult<Repo> {
    let path = path.as_ref();
    let started_at = Instant::now();

    let bytes = fs::read(path).map_err(|err| {
        error!(
            "event=book_load module=store status=error error_code=read_failed error={err}"
        );
        io_error(path, err)
    })?;

    match decode(&bytes) {
        Ok(repo) => {
            info!(
                "event=book_load module=store status=ok items={} duration_ms={}",
                repo.len(),
                started_at.elapsed().as_millis()
            );
            Ok(repo)
        }
        Err(err) => {
            error!(
                "event=book_load module=store status=error error_code=decode_failed line={}",
                err.line()
            );
            Err(StoreError::Codec {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}

/// Encodes `repo` and atomically replaces the book at `path`.
///
/// Existing file permissions are carried over to the new file.
pub fn save_book(path: impl AsRef<Path>, repo: &Repo) -> StoreResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let text = encode(repo);
    let result = write_atomically(dir, path, text.as_bytes());
    match &result {
        Ok(()) => info!(
            "event=book_save module=store status=ok items={} bytes={} duration_ms={}",
            repo.len(),
            text.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=book_save module=store status=error error_code=write_failed error={err}"
        ),
    }
    result
}

fn write_atomically(dir: &Path, path: &Path, data: &[u8]) -> StoreResult<()> {
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| io_error(dir, err))?;
    temp.write_all(data)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|err| io_error(temp.path(), err))?;

    if let Ok(meta) = fs::metadata(path) {
        temp.as_file()
            .set_permissions(meta.permissions())
            .map_err(|err| io_error(temp.path(), err))?;
    }

    temp.persist(path)
        .map_err(|err| io_error(path, err.error))?;
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}
