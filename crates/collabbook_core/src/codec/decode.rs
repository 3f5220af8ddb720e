use super::{CodecError, CodecResult, RECORD_SEPARATOR, SECTION_SENTINEL};
use crate::model::item::{Item, ItemId, ItemKind};
use crate::repo::item_repo::{validate_board_name, Repo};
use chrono::{DateTime, Datelike, Utc};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::time::Instant;

/// Parses a book document into a fresh `Repo`.
///
/// The allocator of the returned repo is advanced past the highest
/// decoded id.
///
/// # Errors
/// - `UnexpectedEndOfInput` when input stops inside a record or before `=====`.
/// - `CorruptDocument` for invalid UTF-8, malformed tokens, duplicate ids or
///   board names, and board members that name no decoded item.
pub fn decode(bytes: &[u8]) -> CodecResult<Repo> {
    let started_at = Instant::now();
    let result = decode_document(bytes);
    match &result {
        Ok(repo) => debug!(
            "event=book_decode module=codec status=ok items={} boards={} bytes={} duration_ms={}",
            repo.len(),
            repo.boards().len(),
            bytes.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => warn!(
            "event=book_decode module=codec status=error line={} bytes={} error={}",
            err.line(),
            bytes.len(),
            err
        ),
    }
    result
}

fn decode_document(bytes: &[u8]) -> CodecResult<Repo> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        let line = bytes[..err.valid_up_to()]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count()
            + 1;
        corrupt(line, format!("invalid utf-8: {err}"))
    })?;

    let mut cursor = LineCursor::new(text);
    let mut repo = Repo::new();
    decode_items(&mut cursor, &mut repo)?;
    decode_boards(&mut cursor, &mut repo)?;
    Ok(repo)
}

struct LineCursor<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    /// Line number of the most recently returned token.
    fn line(&self) -> usize {
        self.line
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.lines.next()?;
        self.line += 1;
        Some(token)
    }

    fn expect(&mut self, expected: &'static str) -> CodecResult<&'a str> {
        self.next_token()
            .ok_or(CodecError::UnexpectedEndOfInput {
                line: self.line + 1,
                expected,
            })
    }
}

fn decode_items(cursor: &mut LineCursor<'_>, repo: &mut Repo) -> CodecResult<()> {
    loop {
        let token = cursor.expect("item id or `=====`")?;
        if token == SECTION_SENTINEL {
            return Ok(());
        }
        let id_line = cursor.line();
        let item = decode_item(token, cursor)?;
        let id = item.id();
        if !repo.restore_item(item) {
            return Err(corrupt(id_line, format!("duplicate item id {id}")));
        }
    }
}

fn decode_item(id_token: &str, cursor: &mut LineCursor<'_>) -> CodecResult<Item> {
    let id = parse_id(id_token, cursor.line())?;

    let kind = match cursor.expect("item kind")? {
        "T" => {
            let completed = parse_flag(cursor.expect("completed flag")?, cursor.line())?;
            ItemKind::Task { completed }
        }
        "N" => ItemKind::Note,
        other => {
            return Err(corrupt(
                cursor.line(),
                format!("unknown item kind `{other}`"),
            ))
        }
    };
    let starred = parse_flag(cursor.expect("starred flag")?, cursor.line())?;
    let created_at = parse_timestamp(cursor.expect("created-at timestamp")?, cursor.line())?;

    let description = cursor.expect("description")?;
    if description == RECORD_SEPARATOR || description == SECTION_SENTINEL {
        return Err(corrupt(
            cursor.line(),
            format!("expected description, found `{description}`"),
        ));
    }

    expect_separator(cursor, "item record")?;
    Ok(Item::from_parts(id, kind, starred, created_at, description))
}

fn decode_boards(cursor: &mut LineCursor<'_>, repo: &mut Repo) -> CodecResult<()> {
    let mut seen = BTreeSet::new();
    while let Some(name) = cursor.next_token() {
        let name_line = cursor.line();
        if validate_board_name(name).is_err() {
            return Err(corrupt(
                name_line,
                format!("invalid board name `{}`", name.escape_debug()),
            ));
        }
        if !seen.insert(name) {
            return Err(corrupt(name_line, format!("duplicate board `{name}`")));
        }

        let mut members = BTreeSet::new();
        loop {
            let token = cursor.expect("board member id or `---`")?;
            if token == RECORD_SEPARATOR {
                break;
            }
            let id = parse_id(token, cursor.line())?;
            if repo.item(id).is_none() {
                return Err(corrupt(
                    cursor.line(),
                    format!("board `{name}` references unknown item {id}"),
                ));
            }
            members.insert(id);
        }
        repo.restore_board(name.to_string(), members);
    }
    Ok(())
}

fn expect_separator(cursor: &mut LineCursor<'_>, record: &'static str) -> CodecResult<()> {
    let token = cursor.expect("`---` record separator")?;
    if token != RECORD_SEPARATOR {
        return Err(corrupt(
            cursor.line(),
            format!("expected `---` after {record}, found `{token}`"),
        ));
    }
    Ok(())
}

fn parse_id(token: &str, line: usize) -> CodecResult<ItemId> {
    // `u64::from_str` also accepts a leading `+`.
    if token.is_empty() || !token.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(corrupt(line, format!("invalid item id `{token}`")));
    }
    token
        .parse::<ItemId>()
        .map_err(|err| corrupt(line, format!("invalid item id `{token}`: {err}")))
}

fn parse_flag(token: &str, line: usize) -> CodecResult<bool> {
    match token {
        "T" => Ok(true),
        "F" => Ok(false),
        other => Err(corrupt(line, format!("expected `T` or `F`, found `{other}`"))),
    }
}

/// Values whose UTC year leaves 0000..=9999 are rejected: RFC 3339 cannot
/// write them back.
fn parse_timestamp(token: &str, line: usize) -> CodecResult<DateTime<Utc>> {
    let value = DateTime::parse_from_rfc3339(token)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| corrupt(line, format!("invalid timestamp `{token}`: {err}")))?;
    if !(0..=9999).contains(&value.year()) {
        return Err(corrupt(
            line,
            format!("timestamp `{token}` is outside years 0000-9999 in UTC"),
        ));
    }
    Ok(value)
}

fn corrupt(line: usize, reason: String) -> CodecError {
    CodecError::CorruptDocument { line, reason }
}

#[cfg(test)]
mod tests {
    use super::{parse_flag, parse_id, parse_timestamp};
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_id_rejects_signs_and_overflow() {
        assert_eq!(parse_id("42", 1).expect("plain digits"), 42);
        assert!(parse_id("+42", 1).is_err());
        assert!(parse_id("-1", 1).is_err());
        assert!(parse_id("", 1).is_err());
        assert!(parse_id("18446744073709551616", 1).is_err());
    }

    #[test]
    fn parse_flag_is_exact() {
        assert!(parse_flag("T", 3).expect("T flag"));
        assert!(!parse_flag("F", 3).expect("F flag"));
        let err = parse_flag("True", 3).expect_err("only single letters");
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn parse_timestamp_normalizes_offsets_to_utc() {
        let parsed = parse_timestamp("2024-03-01T11:30:00+02:00", 5).expect("offset timestamp");
        assert_eq!(
            parsed,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single().expect("valid date")
        );
    }
}
