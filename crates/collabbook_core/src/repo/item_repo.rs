//! In-memory item store with board membership.
//!
//! # Responsibility
//! - Own every `Item` and the board -> member-id index.
//! - Route all mutation (create, flag toggles, membership, delete) through one type.
//!
//! # Invariants
//! - `DEFAULT_BOARD` and `ARCHIVE_BOARD` always exist, even when empty.
//! - Every id in a board set names an item present in the item table.
//! - Deleting an item removes it from every board.
//! - Completion can only be toggled on tasks.

use crate::model::item::{fold_line_breaks, Item, ItemId, ItemKind};
use crate::repo::id_alloc::IdAllocator;
use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Board that receives items created without an explicit board list.
pub const DEFAULT_BOARD: &str = "My board";
/// Board whose members are hidden from the active view.
pub const ARCHIVE_BOARD: &str = "archive";

const RESERVED_LINES: [&str; 2] = ["---", "====="];

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    /// Completion was toggled on a note.
    NotATask(ItemId),
    /// Membership change for an id that is not in the item table.
    ItemNotFound(ItemId),
    InvalidDescription(String),
    InvalidBoardName(String),
    IdSpaceExhausted,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotATask(id) => write!(f, "{id} is not marked as a task"),
            Self::ItemNotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidDescription(value) => write!(f, "invalid description: `{value}`"),
            Self::InvalidBoardName(value) => write!(f, "invalid board name: `{value}`"),
            Self::IdSpaceExhausted => write!(f, "no item ids left to allocate"),
        }
    }
}

impl Error for RepoError {}

/// Authoritative store for one book.
#[derive(Debug, Clone)]
pub struct Repo {
    items: BTreeMap<ItemId, Item>,
    boards: BTreeMap<String, BTreeSet<ItemId>>,
    ids: IdAllocator,
}

impl Default for Repo {
    fn default() -> Self {
        Self::new()
    }
}

/// Two repos are equal when they hold the same items and the same board sets.
/// The allocator position is not part of the comparison.
impl PartialEq for Repo {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items && self.boards == other.boards
    }
}

impl Eq for Repo {}

impl Repo {
    /// Creates an empty repo with both reserved boards seeded.
    pub fn new() -> Self {
        let mut boards = BTreeMap::new();
        boards.insert(DEFAULT_BOARD.to_string(), BTreeSet::new());
        boards.insert(ARCHIVE_BOARD.to_string(), BTreeSet::new());
        Self {
            items: BTreeMap::new(),
            boards,
            ids: IdAllocator::new(),
        }
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// All items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id the next created item will receive, if any are left.
    pub fn next_id(&self) -> Option<ItemId> {
        self.ids.peek()
    }

    /// Board names in ascending order, reserved boards included.
    pub fn boards(&self) -> Vec<&str> {
        self.boards.keys().map(String::as_str).collect()
    }

    pub fn has_board(&self, name: &str) -> bool {
        self.boards.contains_key(name)
    }

    /// Member ids of `name`; empty for unknown and for empty boards alike.
    pub fn ids_in_board(&self, name: &str) -> BTreeSet<ItemId> {
        self.boards.get(name).cloned().unwrap_or_default()
    }

    pub(crate) fn board_entries(&self) -> impl Iterator<Item = (&str, &BTreeSet<ItemId>)> {
        self.boards
            .iter()
            .map(|(name, members)| (name.as_str(), members))
    }

    /// Items that are not members of the archive board.
    pub fn active_items(&self) -> Vec<&Item> {
        let archived = self.boards.get(ARCHIVE_BOARD);
        self.items
            .values()
            .filter(|item| archived.map_or(true, |set| !set.contains(&item.id())))
            .collect()
    }

    /// Union of the members of `names`, each item once, ascending id.
    ///
    /// An empty `names` list yields an empty result.
    pub fn items_in_boards(&self, names: &[&str]) -> Vec<&Item> {
        let mut ids = BTreeSet::new();
        for name in names {
            if let Some(members) = self.boards.get(*name) {
                ids.extend(members.iter().copied());
            }
        }
        ids.into_iter()
            .filter_map(|id| self.items.get(&id))
            .collect()
    }

    /// Creates a note on `boards`, or on the default board when none are given.
    pub fn make_note(&mut self, description: &str, boards: &[&str]) -> RepoResult<&Item> {
        self.make_item(ItemKind::Note, description, boards)
    }

    /// Creates an open task on `boards`, or on the default board when none are given.
    pub fn make_task(&mut self, description: &str, boards: &[&str]) -> RepoResult<&Item> {
        self.make_item(ItemKind::open_task(), description, boards)
    }

    fn make_item(
        &mut self,
        kind: ItemKind,
        description: &str,
        boards: &[&str],
    ) -> RepoResult<&Item> {
        let description = normalize_description(description)?;
        for board in boards {
            validate_board_name(board)?;
        }
        let id = self.ids.allocate().ok_or(RepoError::IdSpaceExhausted)?;

        self.items.insert(id, Item::new(id, kind, description));
        if boards.is_empty() {
            self.link(id, DEFAULT_BOARD);
        } else {
            for board in boards {
                self.link(id, board);
            }
        }

        debug!(
            "event=item_create module=repo status=ok id={} task={} boards={}",
            id,
            matches!(kind, ItemKind::Task { .. }),
            boards.len().max(1)
        );
        self.items.get(&id).ok_or(RepoError::ItemNotFound(id))
    }

    /// Adds `id` to board `name`, creating the board if needed.
    pub fn add_item_to_board(&mut self, id: ItemId, name: &str) -> RepoResult<()> {
        validate_board_name(name)?;
        if !self.items.contains_key(&id) {
            return Err(RepoError::ItemNotFound(id));
        }
        self.link(id, name);
        Ok(())
    }

    /// Removes `id` from board `name`. Returns whether it was a member.
    ///
    /// The board itself is kept even when it becomes empty.
    pub fn remove_item_from_board(&mut self, id: ItemId, name: &str) -> bool {
        self.boards
            .get_mut(name)
            .is_some_and(|members| members.remove(&id))
    }

    /// Adds `id` to the archive board.
    pub fn archive_item(&mut self, id: ItemId) -> RepoResult<()> {
        self.add_item_to_board(id, ARCHIVE_BOARD)
    }

    /// Flips the starred flag. Returns the new value, or `None` if `id` is absent.
    pub fn toggle_starred(&mut self, id: ItemId) -> Option<bool> {
        let item = self.items.get_mut(&id)?;
        let starred = !item.is_starred();
        item.set_starred(starred);
        debug!("event=item_toggle module=repo status=ok id={id} flag=starred value={starred}");
        Some(starred)
    }

    /// Flips completion on a task.
    ///
    /// Returns `Ok(None)` if `id` is absent and `Err(NotATask)` (repo
    /// unchanged) if the item is a note.
    pub fn toggle_task_complete(&mut self, id: ItemId) -> RepoResult<Option<bool>> {
        let Some(item) = self.items.get_mut(&id) else {
            return Ok(None);
        };
        if !item.is_task() {
            return Err(RepoError::NotATask(id));
        }
        let completed = !item.is_complete();
        item.set_complete(completed);
        debug!(
            "event=item_toggle module=repo status=ok id={id} flag=completed value={completed}"
        );
        Ok(Some(completed))
    }

    /// Removes an item and every board membership that referenced it.
    pub fn delete_item(&mut self, id: ItemId) -> Option<Item> {
        let removed = self.items.remove(&id)?;
        let mut unlinked = 0usize;
        for members in self.boards.values_mut() {
            if members.remove(&id) {
                unlinked += 1;
            }
        }
        debug!("event=item_delete module=repo status=ok id={id} boards={unlinked}");
        Some(removed)
    }

    fn link(&mut self, id: ItemId, name: &str) {
        self.boards.entry(name.to_string()).or_default().insert(id);
    }

    /// Inserts a decoded item. Returns `false` when the id is already taken.
    pub(crate) fn restore_item(&mut self, item: Item) -> bool {
        let id = item.id();
        if self.items.contains_key(&id) {
            return false;
        }
        self.ids.advance_past(id);
        self.items.insert(id, item);
        true
    }

    /// Inserts a decoded board, replacing any board of the same name.
    ///
    /// Reserved boards start out empty, so a decoded copy simply replaces them.
    pub(crate) fn restore_board(&mut self, name: String, members: BTreeSet<ItemId>) {
        self.boards.insert(name, members);
    }
}

fn normalize_description(value: &str) -> RepoResult<String> {
    let folded = fold_line_breaks(value);
    let trimmed = folded.trim();
    if trimmed.is_empty() || RESERVED_LINES.contains(&trimmed) {
        return Err(RepoError::InvalidDescription(value.to_string()));
    }
    Ok(folded)
}

pub(crate) fn validate_board_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() || name.contains(['\r', '\n']) {
        return Err(RepoError::InvalidBoardName(name.to_string()));
    }
    Ok(())
}
