use collabbook_core::{Repo, RepoError, ARCHIVE_BOARD, DEFAULT_BOARD};
use std::collections::BTreeSet;

fn ids<'a>(items: impl IntoIterator<Item = &'a collabbook_core::Item>) -> Vec<u64> {
    items.into_iter().map(|item| item.id()).collect()
}

#[test]
fn new_repo_seeds_reserved_boards() {
    let repo = Repo::new();

    assert_eq!(repo.boards(), vec![DEFAULT_BOARD, ARCHIVE_BOARD]);
    assert!(repo.ids_in_board(DEFAULT_BOARD).is_empty());
    assert!(repo.ids_in_board(ARCHIVE_BOARD).is_empty());
    assert!(repo.is_empty());
    assert_eq!(repo.next_id(), Some(0));
}

#[test]
fn ids_are_strictly_increasing_within_a_session() {
    let mut repo = Repo::new();
    let first = repo.make_note("a", &[]).unwrap().id();
    let second = repo.make_task("b", &["x"]).unwrap().id();
    repo.delete_item(second);
    let third = repo.make_note("c", &[]).unwrap().id();

    assert_eq!((first, second, third), (0, 1, 2));
}

#[test]
fn separate_repos_allocate_independently() {
    let mut left = Repo::new();
    let mut right = Repo::new();

    assert_eq!(left.make_note("l", &[]).unwrap().id(), 0);
    assert_eq!(right.make_note("r", &[]).unwrap().id(), 0);
}

#[test]
fn note_without_boards_lands_on_default_board_only() {
    let mut repo = Repo::new();
    let id = repo.make_note("x", &[]).unwrap().id();

    assert_eq!(repo.ids_in_board(DEFAULT_BOARD), BTreeSet::from([id]));
    for board in repo.boards() {
        if board != DEFAULT_BOARD {
            assert!(!repo.ids_in_board(board).contains(&id), "found in {board}");
        }
    }
}

#[test]
fn task_with_board_is_not_placed_on_default_board() {
    let mut repo = Repo::new();
    let task = repo.make_task("y", &["proj"]).unwrap();
    let id = task.id();
    assert!(task.is_task());
    assert!(!task.is_complete());

    assert_eq!(repo.ids_in_board("proj"), BTreeSet::from([id]));
    assert!(repo.ids_in_board(DEFAULT_BOARD).is_empty());
}

#[test]
fn duplicate_boards_in_create_place_item_once() {
    let mut repo = Repo::new();
    let id = repo.make_note("dup", &["a", "a", "b"]).unwrap().id();

    assert_eq!(repo.ids_in_board("a"), BTreeSet::from([id]));
    assert_eq!(repo.items_in_boards(&["a", "b"]).len(), 1);
}

#[test]
fn create_rejects_invalid_input_without_consuming_ids() {
    let mut repo = Repo::new();

    assert!(matches!(
        repo.make_note("   ", &[]),
        Err(RepoError::InvalidDescription(_))
    ));
    assert!(matches!(
        repo.make_task("---", &[]),
        Err(RepoError::InvalidDescription(_))
    ));
    assert!(matches!(
        repo.make_task("fine", &["bad\nboard"]),
        Err(RepoError::InvalidBoardName(_))
    ));
    assert!(repo.is_empty());
    assert_eq!(repo.next_id(), Some(0));
}

#[test]
fn unknown_and_empty_boards_both_return_no_ids() {
    let repo = Repo::new();

    assert!(repo.ids_in_board("missing").is_empty());
    assert!(repo.ids_in_board(DEFAULT_BOARD).is_empty());
    assert!(!repo.has_board("missing"));
    assert!(repo.has_board(DEFAULT_BOARD));
}

#[test]
fn items_in_boards_is_a_deduplicated_union() {
    let mut repo = Repo::new();
    let a = repo.make_note("a", &["one"]).unwrap().id();
    let b = repo.make_note("b", &["one", "two"]).unwrap().id();
    let c = repo.make_task("c", &["two"]).unwrap().id();
    repo.make_note("d", &["three"]).unwrap();

    assert_eq!(ids(repo.items_in_boards(&["one", "two"])), vec![a, b, c]);
    assert_eq!(ids(repo.items_in_boards(&["two", "missing"])), vec![b, c]);
    assert!(repo.items_in_boards(&[]).is_empty());
}

#[test]
fn add_item_to_board_creates_board_lazily() {
    let mut repo = Repo::new();
    let id = repo.make_note("n", &[]).unwrap().id();

    repo.add_item_to_board(id, "later").unwrap();

    assert!(repo.has_board("later"));
    assert_eq!(repo.ids_in_board("later"), BTreeSet::from([id]));
    assert_eq!(repo.ids_in_board(DEFAULT_BOARD), BTreeSet::from([id]));
}

#[test]
fn add_item_to_board_rejects_absent_items() {
    let mut repo = Repo::new();

    let err = repo.add_item_to_board(42, "ghosts").unwrap_err();
    assert_eq!(err, RepoError::ItemNotFound(42));
    assert!(!repo.has_board("ghosts"));
}

#[test]
fn remove_item_from_board_keeps_the_board() {
    let mut repo = Repo::new();
    let id = repo.make_note("n", &["keep"]).unwrap().id();

    assert!(repo.remove_item_from_board(id, "keep"));
    assert!(!repo.remove_item_from_board(id, "keep"));
    assert!(repo.has_board("keep"));
    assert!(repo.item(id).is_some());
}

#[test]
fn toggle_starred_flips_and_ignores_absent_ids() {
    let mut repo = Repo::new();
    let id = repo.make_note("star me", &[]).unwrap().id();

    assert_eq!(repo.toggle_starred(id), Some(true));
    assert!(repo.item(id).unwrap().is_starred());
    assert_eq!(repo.toggle_starred(id), Some(false));
    assert_eq!(repo.toggle_starred(999), None);
}

#[test]
fn toggle_task_complete_on_note_fails_and_leaves_item_unchanged() {
    let mut repo = Repo::new();
    let id = repo.make_note("note", &[]).unwrap().id();
    repo.toggle_starred(id);
    let before = repo.item(id).unwrap().clone();

    let err = repo.toggle_task_complete(id).unwrap_err();

    assert_eq!(err, RepoError::NotATask(id));
    assert_eq!(err.to_string(), format!("{id} is not marked as a task"));
    let after = repo.item(id).unwrap();
    assert_eq!(after, &before);
    assert!(after.is_starred());
    assert!(!after.is_complete());
}

#[test]
fn toggle_task_complete_twice_restores_original_value() {
    let mut repo = Repo::new();
    let id = repo.make_task("task", &[]).unwrap().id();

    assert_eq!(repo.toggle_task_complete(id).unwrap(), Some(true));
    assert!(repo.item(id).unwrap().is_complete());
    assert_eq!(repo.toggle_task_complete(id).unwrap(), Some(false));
    assert!(!repo.item(id).unwrap().is_complete());
    assert_eq!(repo.toggle_task_complete(404).unwrap(), None);
}

#[test]
fn delete_item_cascades_out_of_every_board() {
    let mut repo = Repo::new();
    let id = repo.make_task("gone", &["a", "b"]).unwrap().id();
    repo.archive_item(id).unwrap();
    let survivor = repo.make_note("stays", &["a"]).unwrap().id();

    let removed = repo.delete_item(id).unwrap();

    assert_eq!(removed.id(), id);
    assert!(repo.item(id).is_none());
    for board in repo.boards() {
        assert!(!repo.ids_in_board(board).contains(&id), "dangling in {board}");
    }
    assert_eq!(repo.ids_in_board("a"), BTreeSet::from([survivor]));
    assert!(repo.has_board("b"));
}

#[test]
fn delete_absent_item_returns_none() {
    let mut repo = Repo::new();
    repo.make_note("n", &[]).unwrap();
    let before = repo.clone();

    assert!(repo.delete_item(12).is_none());
    assert_eq!(repo, before);
}

#[test]
fn archived_items_are_hidden_from_active_view_but_retrievable() {
    let mut repo = Repo::new();
    let visible = repo.make_note("visible", &[]).unwrap().id();
    let archived = repo.make_note("archived", &[ARCHIVE_BOARD]).unwrap().id();

    assert_eq!(ids(repo.active_items()), vec![visible]);
    assert_eq!(repo.item(archived).unwrap().description(), "archived");
}

#[test]
fn archiving_an_existing_item_hides_it() {
    let mut repo = Repo::new();
    let id = repo.make_task("old", &["work"]).unwrap().id();

    repo.archive_item(id).unwrap();

    assert!(repo.active_items().is_empty());
    assert_eq!(repo.ids_in_board("work"), BTreeSet::from([id]));
}
