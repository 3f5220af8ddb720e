//! Line-oriented text format for persisting a `Repo`.
//!
//! # Responsibility
//! - Translate a `Repo` to and from the book document grammar.
//! - Report structural problems with the line they were found on.
//!
//! # Invariants
//! - Decode is all-or-nothing: any error means no `Repo` is produced.
//! - `decode(encode(repo))` yields a repo equal to `repo`.
//! - Encode never fails for a repo built through the public API.
//!
//! # Format
//! ```text
//! Document    := ItemRecord* "=====" BoardRecord*
//! ItemRecord  := Id Kind [Completed] Starred CreatedAt Description "---"
//! BoardRecord := Name Id* "---"
//! ```
//! One token per line. `Kind` is `T`/`N`, flags are `T`/`F`, `CreatedAt`
//! is RFC 3339 (written as whole-second UTC). The board section runs to
//! the end of input.

mod decode;
mod encode;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub use decode::decode;
pub use encode::encode;

/// Line separating the item section from the board section.
pub const SECTION_SENTINEL: &str = "=====";
/// Line terminating every item and board record.
pub const RECORD_SEPARATOR: &str = "---";

pub type CodecResult<T> = Result<T, CodecError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Input ended inside a record or before the section sentinel.
    UnexpectedEndOfInput {
        /// 1-based line number where the missing token was expected.
        line: usize,
        expected: &'static str,
    },
    /// A token was present but invalid for its position.
    CorruptDocument { line: usize, reason: String },
}

impl CodecError {
    /// 1-based line number the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedEndOfInput { line, .. } | Self::CorruptDocument { line, .. } => *line,
        }
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnexpectedEndOfInput { line, expected } => {
                write!(f, "unexpected end of input at line {line}: expected {expected}")
            }
            Self::CorruptDocument { line, reason } => {
                write!(f, "corrupt document at line {line}: {reason}")
            }
        }
    }
}

impl Error for CodecError {}
