//! Item domain model.
//!
//! # Responsibility
//! - Define the single record shape shared by notes and tasks.
//! - Keep completion state structurally attached to the task kind.
//!
//! # Invariants
//! - `id` is assigned once by the owning `Repo` and never mutated.
//! - `created_at` is captured at creation with whole-second precision.
//! - Completion is only observable on `ItemKind::Task`.
//! - `description` is one logical line (no `\r` or `\n`).

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Identifier handed out by the repo allocator.
pub type ItemId = u64;

/// Note or task. Only tasks carry a completion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Free-form note.
    Note,
    /// Actionable task.
    Task {
        /// Whether the task has been checked off.
        completed: bool,
    },
}

impl ItemKind {
    /// A task that has not been completed yet.
    pub const fn open_task() -> Self {
        Self::Task { completed: false }
    }
}

/// One tracked note or task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    #[serde(flatten)]
    kind: ItemKind,
    starred: bool,
    created_at: DateTime<Utc>,
    description: String,
}

impl Item {
    /// Creates an item stamped with the current time.
    ///
    /// The timestamp is truncated to whole seconds so that the in-memory
    /// value is identical to what the codec persists.
    pub fn new(id: ItemId, kind: ItemKind, description: impl Into<String>) -> Self {
        Self::from_parts(id, kind, false, Utc::now(), description)
    }

    /// Rebuilds an item from already-known fields (decode path).
    pub fn from_parts(
        id: ItemId,
        kind: ItemKind,
        starred: bool,
        created_at: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind,
            starred,
            created_at: created_at.trunc_subsecs(0),
            description: fold_line_breaks(&description.into()),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_task(&self) -> bool {
        matches!(self.kind, ItemKind::Task { .. })
    }

    pub fn is_starred(&self) -> bool {
        self.starred
    }

    /// True only for a task whose completion flag is set.
    pub fn is_complete(&self) -> bool {
        matches!(self.kind, ItemKind::Task { completed: true })
    }

    pub fn set_starred(&mut self, value: bool) {
        self.starred = value;
    }

    /// Sets task completion. Notes are left untouched.
    pub fn set_complete(&mut self, value: bool) {
        if let ItemKind::Task { completed } = &mut self.kind {
            *completed = value;
        }
    }
}

/// Collapses every run of `\r`/`\n` into a single space.
pub(crate) fn fold_line_breaks(value: &str) -> String {
    if !value.contains(['\r', '\n']) {
        return value.to_string();
    }
    let mut folded = String::with_capacity(value.len());
    let mut in_break = false;
    for ch in value.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_break {
                folded.push(' ');
            }
            in_break = true;
        } else {
            folded.push(ch);
            in_break = false;
        }
    }
    folded
}
