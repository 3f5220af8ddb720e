//! Command handlers: load the book, apply one command, save if it changed.

use crate::cli::{split_item_words, Command};
use crate::render::{self, Palette};
use anyhow::{Context, Result};
use collabbook_core::{
    active_overview, boards_overview, find_book, init_book, load_book, save_book, Item, ItemId,
    Repo, RepoError, StoreError,
};
use log::info;
use std::path::{Path, PathBuf};

/// Text to print plus whether the command fully succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub text: String,
    pub ok: bool,
}

impl CommandOutput {
    fn ok(text: String) -> Self {
        Self { text, ok: true }
    }

    fn failed(text: String) -> Self {
        Self { text, ok: false }
    }
}

/// The book file located for this invocation.
struct Book {
    path: PathBuf,
    repo: Repo,
}

impl Book {
    fn open(cwd: &Path) -> Result<Self> {
        let path = find_book(cwd)?;
        let repo = load_book(&path)?;
        Ok(Self { path, repo })
    }

    fn save(&self) -> Result<()> {
        save_book(&self.path, &self.repo)
            .with_context(|| format!("Could not write {}", self.path.display()))
    }
}

#[derive(Debug, Clone, Copy)]
enum ItemAction {
    Star,
    Check,
    Delete,
    Archive,
}

pub fn execute(command: Command, cwd: &Path, palette: Palette) -> Result<CommandOutput> {
    info!("event=command_start module=cli command={}", command_name(&command));
    match command {
        Command::Init => init(cwd, palette),
        Command::List { boards, json } => list(cwd, &boards, json, palette),
        Command::Task { words } => create(cwd, &words, true, palette),
        Command::Note { words } => create(cwd, &words, false, palette),
        Command::Star { ids } => apply_to_items(cwd, &ids, ItemAction::Star, palette),
        Command::Check { ids } => apply_to_items(cwd, &ids, ItemAction::Check, palette),
        Command::Delete { ids } => apply_to_items(cwd, &ids, ItemAction::Delete, palette),
        Command::Archive { ids } => apply_to_items(cwd, &ids, ItemAction::Archive, palette),
        Command::Move { id, board } => move_item(cwd, id, &board, palette),
        Command::Boards => {
            let book = Book::open(cwd)?;
            Ok(CommandOutput::ok(render::render_boards(palette, &book.repo)))
        }
    }
}

fn init(cwd: &Path, palette: Palette) -> Result<CommandOutput> {
    match init_book(cwd) {
        Ok(path) => Ok(CommandOutput::ok(render::success(
            palette,
            ":-)",
            &format!("Created new book at {}", path.display()),
        ))),
        Err(err @ StoreError::AlreadyInitialized(_)) => Ok(CommandOutput::failed(
            render::failure(palette, ":-/", &err.to_string()),
        )),
        Err(err) => Err(err.into()),
    }
}

fn list(cwd: &Path, boards: &[String], json: bool, palette: Palette) -> Result<CommandOutput> {
    let book = Book::open(cwd)?;
    let names: Vec<&str> = boards.iter().map(String::as_str).collect();
    let sections = if names.is_empty() {
        active_overview(&book.repo)
    } else {
        boards_overview(&book.repo, &names)
    };

    if json {
        let mut items: Vec<&Item> = sections
            .iter()
            .flat_map(|section| section.items.iter().copied())
            .collect();
        items.sort_by_key(|item| item.id());
        items.dedup_by_key(|item| item.id());
        let mut text = serde_json::to_string_pretty(&items).context("Could not encode items")?;
        text.push('\n');
        return Ok(CommandOutput::ok(text));
    }

    Ok(CommandOutput::ok(render::render_overview(palette, &sections)))
}

fn create(cwd: &Path, words: &[String], task: bool, palette: Palette) -> Result<CommandOutput> {
    let noun = if task { "task" } else { "note" };
    let (description, boards) = split_item_words(words);
    if description.trim().is_empty() {
        return Ok(CommandOutput::failed(render::failure(
            palette,
            r":-\",
            &format!("No description found for your {noun}"),
        )));
    }

    let mut book = Book::open(cwd)?;
    let boards: Vec<&str> = boards.iter().map(String::as_str).collect();
    let created = if task {
        book.repo.make_task(&description, &boards)
    } else {
        book.repo.make_note(&description, &boards)
    }
    .map(Item::id);

    match created {
        Ok(id) => {
            book.save()?;
            Ok(CommandOutput::ok(render::success(
                palette,
                ":-)",
                &format!("Created {noun}: {id}"),
            )))
        }
        Err(err) => Ok(CommandOutput::failed(render::failure(
            palette,
            r":-\",
            &err.to_string(),
        ))),
    }
}

fn apply_to_items(
    cwd: &Path,
    ids: &[ItemId],
    action: ItemAction,
    palette: Palette,
) -> Result<CommandOutput> {
    let mut book = Book::open(cwd)?;
    let mut text = String::new();
    let mut changed = false;
    let mut ok = true;

    for &id in ids {
        match apply_one(&mut book.repo, id, action) {
            Ok(Some(message)) => {
                changed = true;
                text.push_str(&render::success(palette, ":-)", &message));
            }
            Ok(None) => {
                text.push_str(&render::failure(palette, ":-/", &format!("No item with id {id}")));
            }
            Err(err) => {
                ok = false;
                text.push_str(&render::failure(palette, ":-O", &err.to_string()));
            }
        }
    }

    if changed {
        book.save()?;
    }
    Ok(CommandOutput { text, ok })
}

/// `Ok(None)` when `id` is absent.
fn apply_one(repo: &mut Repo, id: ItemId, action: ItemAction) -> Result<Option<String>, RepoError> {
    let message = match action {
        ItemAction::Star => repo.toggle_starred(id).map(|starred| {
            if starred {
                format!("Starred item {id}")
            } else {
                format!("Unstarred item {id}")
            }
        }),
        ItemAction::Check => repo.toggle_task_complete(id)?.map(|completed| {
            if completed {
                format!("Checked task {id}")
            } else {
                format!("Unchecked task {id}")
            }
        }),
        ItemAction::Delete => repo
            .delete_item(id)
            .map(|_| format!("Deleted item {id}")),
        ItemAction::Archive => match repo.archive_item(id) {
            Ok(()) => Some(format!("Archived item {id}")),
            Err(RepoError::ItemNotFound(_)) => None,
            Err(err) => return Err(err),
        },
    };
    Ok(message)
}

fn move_item(cwd: &Path, id: ItemId, board: &str, palette: Palette) -> Result<CommandOutput> {
    let mut book = Book::open(cwd)?;
    match book.repo.add_item_to_board(id, board) {
        Ok(()) => {
            book.save()?;
            Ok(CommandOutput::ok(render::success(
                palette,
                ":-)",
                &format!("Added item {id} to {board}"),
            )))
        }
        Err(err) => Ok(CommandOutput::failed(render::failure(
            palette,
            ":-O",
            &err.to_string(),
        ))),
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Init => "init",
        Command::List { .. } => "list",
        Command::Task { .. } => "task",
        Command::Note { .. } => "note",
        Command::Star { .. } => "star",
        Command::Check { .. } => "check",
        Command::Delete { .. } => "delete",
        Command::Archive { .. } => "archive",
        Command::Move { .. } => "move",
        Command::Boards => "boards",
    }
}
