//! Rendering of notes and results, either for humans or as JSON.

use std::io::IsTerminal;

use chrono::{Local, TimeZone};
use comfy_table::presets::UTF8_FULL;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use locknote_core::{ErrorKind, NoteView, Outcome};
use owo_colors::OwoColorize;

/// Output settings resolved from flags and the terminal.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
    pub color: bool,
}

impl Output {
    pub fn from_env(json: bool, quiet: bool) -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let no_color = std::env::var("NO_COLOR").is_ok()
            || std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        Self {
            json,
            quiet,
            color: is_tty && !no_color && !json,
        }
    }

    /// Print a single note, e.g. after `show` or `new`.
    pub fn note(&self, view: &NoteView) {
        if self.json {
            println!("{}", to_json(&Outcome::Success(view)));
            return;
        }
        if self.quiet {
            println!("{}", view.id);
            return;
        }
        println!("{}", self.note_header(view));
        if !view.tags.is_empty() {
            println!("{}", self.dim(&format!("tags: {}", view.tags.join(", "))));
        }
        println!("{}", self.dim(&format!("updated: {}", format_time(view.updated_at))));
        println!();
        println!("{}", view.content);
    }

    /// Print a short receipt after a mutating command.
    pub fn receipt(&self, action: &str, view: &NoteView) {
        if self.json {
            println!("{}", to_json(&Outcome::Success(view)));
        } else if self.quiet {
            println!("{}", view.id);
        } else {
            let badge = if self.color {
                "[OK]".green().to_string()
            } else {
                "[OK]".to_string()
            };
            println!("{} {} note {}", badge, action, view.id);
        }
    }

    /// Print a list of notes as a table.
    pub fn notes(&self, views: &[NoteView], trash: bool) {
        if self.json {
            let value = serde_json::json!({ "success": true, "notes": views });
            println!("{}", value);
            return;
        }
        if self.quiet {
            for view in views {
                println!("{}", view.id);
            }
            return;
        }
        if views.is_empty() {
            println!("{}", if trash { "Trash is empty" } else { "No notes" });
            return;
        }
        println!("{}", notes_table(views, trash, self.color));
    }

    /// Print the number of notes removed by `empty-trash`.
    pub fn purged(&self, count: usize) {
        if self.json {
            println!("{}", serde_json::json!({ "success": true, "purged": count }));
        } else if !self.quiet {
            println!("Purged {} note(s)", count);
        }
    }

    /// Print a command failure to stderr, or as a JSON failure on stdout.
    pub fn error(&self, kind: Option<ErrorKind>, message: &str) {
        if self.json {
            let value = match kind {
                Some(kind) => serde_json::json!({ "success": false, "kind": kind, "error": message }),
                None => serde_json::json!({ "success": false, "error": message }),
            };
            println!("{}", value);
        } else if self.color {
            eprintln!("{} {}", "Error:".red().bold(), message);
        } else {
            eprintln!("Error: {}", message);
        }
    }

    fn note_header(&self, view: &NoteView) -> String {
        let mut header = format!("#{}", view.id);
        if view.pinned {
            header.push_str(" [pinned]");
        }
        if view.locked {
            header.push_str(" [locked]");
        }
        if self.color {
            header.bold().to_string()
        } else {
            header
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }
}

fn to_json<T: serde::Serialize>(outcome: &Outcome<T>) -> String {
    serde_json::to_string(outcome).unwrap_or_else(|_| "{\"success\":false}".to_string())
}

fn notes_table(views: &[NoteView], trash: bool, color: bool) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let when = if trash { "Deleted" } else { "Updated" };
    let headers: Vec<Cell> = ["ID", "", "Preview", "Tags", when]
        .into_iter()
        .map(|header| {
            let cell = Cell::new(header);
            if color {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(headers);

    for view in views {
        let time = if trash {
            view.deleted_at.unwrap_or(view.updated_at)
        } else {
            view.updated_at
        };
        table.add_row(vec![
            view.id.to_string(),
            markers(view),
            view.preview.clone(),
            view.tags.join(", "),
            format_time(time),
        ]);
    }

    table.to_string()
}

fn markers(view: &NoteView) -> String {
    let mut out = String::new();
    if view.pinned {
        out.push('P');
    }
    if view.locked {
        out.push('L');
    }
    out
}

/// Format epoch milliseconds in local time.
pub fn format_time(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: i64, pinned: bool, locked: bool) -> NoteView {
        NoteView {
            id,
            content: "body".to_string(),
            preview: "body".to_string(),
            locked,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
            pinned,
            tags: vec!["work".to_string()],
        }
    }

    #[test]
    fn test_markers() {
        assert_eq!(markers(&view(1, false, false)), "");
        assert_eq!(markers(&view(1, true, true)), "PL");
    }

    #[test]
    fn test_table_contains_rows() {
        let rendered = notes_table(&[view(42, true, false)], false, false);
        assert!(rendered.contains("42"));
        assert!(rendered.contains("work"));
        assert!(rendered.contains("Updated"));
    }

    #[test]
    fn test_out_of_range_time_falls_back_to_millis() {
        assert_eq!(format_time(i64::MAX), i64::MAX.to_string());
    }
}
