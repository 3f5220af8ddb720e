use super::{RECORD_SEPARATOR, SECTION_SENTINEL};
use crate::model::item::{Item, ItemId, ItemKind};
use crate::repo::item_repo::Repo;
use chrono::SecondsFormat;
use log::debug;
use std::collections::BTreeSet;

/// Renders `repo` as a book document.
///
/// Items are written in ascending id order and boards in ascending name
/// order; every board is written, reserved ones included.
pub fn encode(repo: &Repo) -> String {
    let mut out = String::new();
    for item in repo.items() {
        write_item(&mut out, item);
    }
    push_line(&mut out, SECTION_SENTINEL);

    let mut boards = 0usize;
    for (name, members) in repo.board_entries() {
        write_board(&mut out, name, members);
        boards += 1;
    }

    debug!(
        "event=book_encode module=codec status=ok items={} boards={} bytes={}",
        repo.len(),
        boards,
        out.len()
    );
    out
}

fn write_item(out: &mut String, item: &Item) {
    push_line(out, &item.id().to_string());
    match item.kind() {
        ItemKind::Task { completed } => {
            push_line(out, "T");
            push_line(out, flag(completed));
        }
        ItemKind::Note => push_line(out, "N"),
    }
    push_line(out, flag(item.is_starred()));
    push_line(
        out,
        &item.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
    );
    push_line(out, item.description());
    push_line(out, RECORD_SEPARATOR);
}

fn write_board(out: &mut String, name: &str, members: &BTreeSet<ItemId>) {
    push_line(out, name);
    for id in members {
        push_line(out, &id.to_string());
    }
    push_line(out, RECORD_SEPARATOR);
}

fn flag(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::encode;
    use crate::repo::item_repo::Repo;

    #[test]
    fn empty_repo_encodes_sentinel_and_reserved_boards() {
        let text = encode(&Repo::new());
        assert_eq!(text, "=====\nMy board\n---\narchive\n---\n");
    }
}
