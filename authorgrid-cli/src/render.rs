//! Plain-text rendering of a grid snapshot.

use std::fmt::Write;

use authorgrid_lib::focus::FieldKind;
use authorgrid_lib::focus::FieldRef;
use authorgrid_lib::grid::Snapshot;

const AUTHOR_WIDTH: usize = 24;
const TEXT_WIDTH: usize = 32;

/// Renders the visible page as a table.
///
/// The focused field is marked with `*`. Folded columns show as `~`.
pub fn render(snapshot: &Snapshot, focused: Option<FieldRef>) -> String {
    let mut out = String::new();

    let _ = write!(
        out,
        "{:>4}  {:<w1$}  {:<w2$}",
        "#",
        "Author",
        "Affiliations",
        w1 = AUTHOR_WIDTH,
        w2 = TEXT_WIDTH,
    );
    for column in &snapshot.columns {
        let _ = write!(out, " | {}", header(column.number, &column.label, column.folded));
    }
    out.push('\n');

    for row in &snapshot.rows {
        let mark = |kind: FieldKind| match focused {
            Some(f) if f.row == row.id && f.kind == kind => '*',
            _ => ' ',
        };
        let _ = write!(
            out,
            "{:>4}  {}{:<w1$}  {}{:<w2$}",
            row.index + 1,
            mark(FieldKind::Author),
            clip(&row.author, AUTHOR_WIDTH - 1),
            mark(FieldKind::Affiliations),
            clip(&row.affiliation_text, TEXT_WIDTH - 1),
            w1 = AUTHOR_WIDTH - 1,
            w2 = TEXT_WIDTH - 1,
        );
        for (column, checked) in snapshot.columns.iter().zip(&row.checked) {
            let width = header(column.number, &column.label, column.folded).chars().count();
            let cell = match (column.folded, checked) {
                (true, _) => "~",
                (false, true) => "x",
                (false, false) => ".",
            };
            let _ = write!(out, " | {cell:^width$}");
        }
        out.push('\n');
    }

    if snapshot.pagination.show_controls {
        let _ = write!(
            out,
            "{}  (page {} of {})",
            snapshot.pagination.status,
            snapshot.pagination.offset / snapshot.pagination.page_size.max(1) + 1,
            snapshot.pagination.page_count
        );
    } else {
        out.push_str(&snapshot.pagination.status);
    }
    out.push('\n');
    out
}

fn header(number: usize, label: &str, folded: bool) -> String {
    if folded {
        format!("{number}:~")
    } else {
        format!("{number}:{label}")
    }
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let head: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{head}…")
}
