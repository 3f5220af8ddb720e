//! Board-grouped read model for listing a book.
//!
//! # Responsibility
//! - Group items into per-board sections for display.
//! - Tally done/pending tasks and notes across the shown sections.
//!
//! # Invariants
//! - Sections never include empty boards.
//! - The active overview never shows the archive board or archived items.
//! - Items inside a section are in ascending id order.

use crate::model::item::Item;
use crate::repo::item_repo::{Repo, ARCHIVE_BOARD};

/// Items of one board, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSection<'a> {
    pub name: &'a str,
    pub items: Vec<&'a Item>,
}

impl BoardSection<'_> {
    /// Per-board counts, used for `[done/total]` headings.
    pub fn tally(&self) -> Tally {
        Tally::from_items(self.items.iter().copied())
    }
}

/// Done/pending task counts plus note count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub done: usize,
    pub pending: usize,
    pub notes: usize,
}

impl Tally {
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a Item>) -> Self {
        let mut tally = Self::default();
        for item in items {
            tally.record(item);
        }
        tally
    }

    /// Sums the tallies of every section. An item on several boards is counted once per board.
    pub fn from_sections(sections: &[BoardSection<'_>]) -> Self {
        sections
            .iter()
            .map(BoardSection::tally)
            .fold(Self::default(), |acc, next| Self {
                done: acc.done + next.done,
                pending: acc.pending + next.pending,
                notes: acc.notes + next.notes,
            })
    }

    pub fn tasks(&self) -> usize {
        self.done + self.pending
    }

    /// Integer percentage of completed tasks; 100 when there are no tasks.
    pub fn percent_complete(&self) -> usize {
        match self.tasks() {
            0 => 100,
            tasks => self.done * 100 / tasks,
        }
    }

    fn record(&mut self, item: &Item) {
        if !item.is_task() {
            self.notes += 1;
        } else if item.is_complete() {
            self.done += 1;
        } else {
            self.pending += 1;
        }
    }
}

/// One section per non-archive board that holds at least one active item.
pub fn active_overview(repo: &Repo) -> Vec<BoardSection<'_>> {
    let archived = repo.ids_in_board(ARCHIVE_BOARD);
    repo.boards()
        .into_iter()
        .filter(|name| *name != ARCHIVE_BOARD)
        .filter_map(|name| {
            let items: Vec<&Item> = repo
                .items_in_boards(&[name])
                .into_iter()
                .filter(|item| !archived.contains(&item.id()))
                .collect();
            (!items.is_empty()).then_some(BoardSection { name, items })
        })
        .collect()
}

/// One section per requested board that exists and is non-empty, in request order.
///
/// Requesting the same board twice yields one section.
pub fn boards_overview<'a>(repo: &'a Repo, names: &[&str]) -> Vec<BoardSection<'a>> {
    let known = repo.boards();
    let mut sections: Vec<BoardSection<'a>> = Vec::new();
    for requested in names {
        let Some(name) = known.iter().copied().find(|name| name == requested) else {
            continue;
        };
        if sections.iter().any(|section| section.name == name) {
            continue;
        }
        let items = repo.items_in_boards(&[name]);
        if !items.is_empty() {
            sections.push(BoardSection { name, items });
        }
    }
    sections
}
