//! Human-readable renderer for `cb` output.
//!
//! Pure formatting: callers gather the data and print the returned strings.

use collabbook_core::{BoardSection, Item, Repo, Tally};

const RESET: &str = "\x1b[0m";

/// ANSI coloring that can be switched off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    pub fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    pub fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint("34", text)
    }

    pub fn white(&self, text: &str) -> String {
        self.paint("1;37", text)
    }
}

pub fn success(palette: Palette, emote: &str, message: &str) -> String {
    format!("  {} {message}\n", palette.green(emote))
}

pub fn failure(palette: Palette, emote: &str, message: &str) -> String {
    format!("  {} {message}\n", palette.red(emote))
}

/// Board sections followed by the completion footer.
pub fn render_overview(palette: Palette, sections: &[BoardSection<'_>]) -> String {
    if sections.is_empty() {
        return success(palette, r"\(^_^)/", "All done!");
    }

    let mut out = String::new();
    for section in sections {
        let tally = section.tally();
        out.push_str(&format!(
            "  {} [{}/{}]\n",
            palette.white(section.name),
            tally.done,
            tally.tasks()
        ));
        for item in &section.items {
            out.push_str(&render_item(palette, item));
        }
        out.push('\n');
    }
    out.push_str(&render_footer(palette, Tally::from_sections(sections)));
    out
}

pub fn render_item(palette: Palette, item: &Item) -> String {
    let star = if item.is_starred() {
        format!(" {}", palette.yellow("**"))
    } else {
        String::new()
    };
    format!(
        "  {:>4}. {} {}{star}\n",
        item.id(),
        checkbox(palette, item),
        description(palette, item)
    )
}

pub fn render_footer(palette: Palette, tally: Tally) -> String {
    format!(
        "  {}% of all tasks complete.\n  {} done - {} pending - {} notes\n",
        tally.percent_complete(),
        palette.green(&tally.done.to_string()),
        palette.yellow(&tally.pending.to_string()),
        palette.blue(&tally.notes.to_string())
    )
}

/// Every board with its member count, reserved boards included.
pub fn render_boards(palette: Palette, repo: &Repo) -> String {
    let mut out = String::new();
    for name in repo.boards() {
        out.push_str(&format!(
            "  {} ({})\n",
            palette.white(name),
            repo.ids_in_board(name).len()
        ));
    }
    out
}

fn checkbox(palette: Palette, item: &Item) -> String {
    if !item.is_task() {
        " - ".to_string()
    } else if item.is_complete() {
        format!("[{}]", palette.green("X"))
    } else {
        "[ ]".to_string()
    }
}

fn description(palette: Palette, item: &Item) -> String {
    if item.is_starred() && !item.is_complete() {
        palette.yellow(item.description())
    } else {
        item.description().to_string()
    }
}
