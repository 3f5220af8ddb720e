//! Command-line surface of `cb`.

use clap::{Parser, Subcommand};
use collabbook_core::ItemId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cb")]
#[command(about = "Tasks, boards & notes for the command-line habitat")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to $COLLABBOOK_CONFIG, then ~/.collabbook.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new book in the current directory
    #[command(display_order = 1)]
    Init,
    /// Show active items grouped by board (or only the given boards)
    #[command(display_order = 2)]
    List {
        /// Boards to show
        boards: Vec<String>,

        /// Print items as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a task. Words starting with '#' or '@' name boards.
    #[command(visible_alias = "t", display_order = 3)]
    Task {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Create a note. Words starting with '#' or '@' name boards.
    #[command(visible_alias = "n", display_order = 4)]
    Note {
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Toggle the star on items
    #[command(display_order = 5)]
    Star {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    /// Toggle completion of tasks
    #[command(display_order = 6)]
    Check {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    /// Delete items
    #[command(display_order = 7)]
    Delete {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    /// Hide items from the active view
    #[command(display_order = 8)]
    Archive {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    /// Add an item to a board
    #[command(display_order = 9)]
    Move { id: ItemId, board: String },
    /// List boards with their item counts
    #[command(display_order = 10)]
    Boards,
}

impl Default for Command {
    fn default() -> Self {
        Self::List {
            boards: Vec::new(),
            json: false,
        }
    }
}

/// Splits creation words into `(description, boards)`.
///
/// `#name` and `@name` select board `name`; a bare `#` or `@` stays part of
/// the description.
pub fn split_item_words(words: &[String]) -> (String, Vec<String>) {
    let mut description = Vec::new();
    let mut boards = Vec::new();
    for word in words {
        match word.strip_prefix(['#', '@']) {
            Some(board) if !board.trim().is_empty() => boards.push(board.to_string()),
            _ => description.push(word.as_str()),
        }
    }
    (description.join(" "), boards)
}

#[cfg(test)]
mod tests {
    use super::{split_item_words, Cli, Command};
    use clap::Parser;

    fn words(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn split_item_words_extracts_boards_anywhere() {
        let (description, boards) =
            split_item_words(&words(&["#1", "fix", "@Name has spaces", "the", "bug"]));
        assert_eq!(description, "fix the bug");
        assert_eq!(boards, vec!["1".to_string(), "Name has spaces".to_string()]);
    }

    #[test]
    fn split_item_words_keeps_bare_markers_in_description() {
        let (description, boards) = split_item_words(&words(&["ticket", "#", "42"]));
        assert_eq!(description, "ticket # 42");
        assert!(boards.is_empty());
    }

    #[test]
    fn bare_invocation_has_no_command() {
        let cli = Cli::try_parse_from(["cb"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(Command::default(), Command::List { boards: vec![], json: false });
    }

    #[test]
    fn task_alias_and_global_flags_parse() {
        let cli = Cli::try_parse_from(["cb", "--no-color", "t", "#home", "water", "plants"]).unwrap();
        assert!(cli.no_color);
        assert_eq!(
            cli.command,
            Some(Command::Task {
                words: words(&["#home", "water", "plants"]),
            })
        );
    }

    #[test]
    fn id_commands_require_numeric_ids() {
        assert!(Cli::try_parse_from(["cb", "star"]).is_err());
        assert!(Cli::try_parse_from(["cb", "check", "abc"]).is_err());
        let cli = Cli::try_parse_from(["cb", "delete", "3", "5"]).unwrap();
        assert_eq!(cli.command, Some(Command::Delete { ids: vec![3, 5] }));
    }
}
