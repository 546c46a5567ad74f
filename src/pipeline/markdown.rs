//! Markdown emission with heading and table heuristics.
//!
//! Input is one paragraph (or an empty separator) per entry. Rules, in order:
//!
//! 1. an empty entry emits a newline and ends any table;
//! 2. a short entry (fewer than `heading_max_chars` characters) that opens
//!    the page or follows a separator, and is followed by a non-empty entry,
//!    becomes a `###` heading;
//! 3. an entry containing `|` (or else a tab) becomes a table row, the first
//!    row of a run also getting a `---` separator row;
//! 4. anything else is a plain paragraph.
//!
//! These are layout guesses, not semantics: any short standalone paragraph
//! followed by text will be rendered as a heading.

use crate::config::LayoutConfig;

fn is_blank(entry: &str) -> bool {
    entry.trim().is_empty()
}

fn table_cells(entry: &str) -> Option<Vec<&str>> {
    if entry.contains('|') {
        Some(entry.split('|').collect())
    } else if entry.contains('\t') {
        Some(entry.split('\t').collect())
    } else {
        None
    }
}

fn push_row(out: &mut String, cells: &[&str]) {
    out.push_str("| ");
    out.push_str(&cells.join(" | "));
    out.push_str(" |\n");
}

/// Render assembled paragraphs as Markdown.
pub fn emit_markdown<S: AsRef<str>>(entries: &[S], layout: &LayoutConfig) -> String {
    let mut out = String::new();
    let mut in_table = false;

    for (i, entry) in entries.iter().enumerate() {
        let entry = entry.as_ref();
        if is_blank(entry) {
            out.push('\n');
            in_table = false;
            continue;
        }

        let opens_block = i == 0 || is_blank(entries[i - 1].as_ref());
        let has_body = entries.get(i + 1).is_some_and(|n| !is_blank(n.as_ref()));
        if entry.chars().count() < layout.heading_max_chars && opens_block && has_body {
            out.push_str("### ");
            out.push_str(entry);
            out.push_str("\n\n");
            continue;
        }

        if let Some(cells) = table_cells(entry) {
            push_row(&mut out, &cells);
            if !in_table {
                in_table = true;
                let separator = vec!["---"; cells.len()];
                push_row(&mut out, &separator);
            }
        } else {
            in_table = false;
            out.push_str(entry);
            out.push_str("\n\n");
        }
    }

    out
}
