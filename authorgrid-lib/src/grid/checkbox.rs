//! Checkbox edits, shift-click ranges and column folding.

use crate::model::RowId;
use crate::model::text::escape_html;

use super::Grid;

/// The last single-clicked checkbox cell.
///
/// A following shift-click replays `checked` across the rectangle between
/// this cell and the clicked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAnchor {
    /// Row of the anchor cell.
    pub row: RowId,
    /// Column name of the anchor cell.
    pub column: String,
    /// State the anchor cell was set to.
    pub checked: bool,
}

impl Grid {
    /// Sets or clears one affiliation on a row.
    ///
    /// Checking appends the affiliation if absent; unchecking removes its
    /// first occurrence. The row's box text is derived from the list, so it
    /// follows immediately.
    ///
    /// `column` is a stored name, already escaped.
    pub fn set_checked(&mut self, id: RowId, column: &str, checked: bool) -> bool {
        if column.trim().is_empty() || !self.contains(id) {
            return false;
        }
        if checked {
            self.add_column(column);
        }
        let Some(record) = self.record_mut(id) else {
            return false;
        };
        if checked {
            record.check(column)
        } else {
            record.uncheck(column)
        }
    }

    /// Sets the checkbox for `column` on the row at `index`.
    ///
    /// `column` is user input: it is trimmed and escaped before it is
    /// matched against or added to the columns.
    pub fn toggle_checkbox(&mut self, index: usize, column: &str, checked: bool) -> bool {
        let column = escape_html(column.trim());
        self.row_id(index)
            .is_some_and(|id| self.set_checked(id, &column, checked))
    }

    /// Applies `checked` to every visible cell in the rectangle spanned by
    /// two corners, inclusive. Folded columns are skipped.
    ///
    /// Returns the number of cells that changed. No-op if any corner is out
    /// of range.
    pub fn toggle_checkbox_range(
        &mut self,
        row1: usize,
        col1: usize,
        row2: usize,
        col2: usize,
        checked: bool,
    ) -> usize {
        let rows = self.len();
        let cols = self.columns.len();
        if row1.max(row2) >= rows || col1.max(col2) >= cols {
            return 0;
        }

        let targets: Vec<String> = (col1.min(col2)..=col1.max(col2))
            .map(|c| self.columns[c].clone())
            .filter(|name| !self.is_folded(name))
            .collect();
        let ids: Vec<RowId> = self.order[row1.min(row2)..=row1.max(row2)].to_vec();

        let mut changed = 0;
        for id in ids {
            for column in &targets {
                if self.set_checked(id, column, checked) {
                    changed += 1;
                }
            }
        }
        log::debug!(
            "Range toggle rows {}..={} cols {}..={} -> {} ({} changed)",
            row1.min(row2),
            row1.max(row2),
            col1.min(col2),
            col1.max(col2),
            checked,
            changed
        );
        changed
    }

    /// Handles a click on the checkbox at (`row`, `col`).
    ///
    /// A plain click sets the cell and becomes the new anchor. A shift-click
    /// with an anchor replays the anchor's state across the rectangle and
    /// clears the anchor; without a usable anchor it acts as a plain click.
    ///
    /// Returns the number of cells that changed.
    pub fn click_checkbox(&mut self, row: usize, col: usize, checked: bool, shift: bool) -> usize {
        let (Some(id), Some(column)) = (self.row_id(row), self.columns.get(col).cloned()) else {
            return 0;
        };

        if shift && let Some(anchor) = self.anchor.take() {
            let corner = self
                .position(anchor.row)
                .zip(self.column_index(&anchor.column));
            if let Some((anchor_row, anchor_col)) = corner {
                return self.toggle_checkbox_range(anchor_row, anchor_col, row, col, anchor.checked);
            }
        }

        let changed = self.set_checked(id, &column, checked);
        self.anchor = Some(CellAnchor {
            row: id,
            column,
            checked,
        });
        usize::from(changed)
    }

    /// Returns the current shift-click anchor.
    pub fn anchor(&self) -> Option<&CellAnchor> {
        self.anchor.as_ref()
    }

    /// Forgets the shift-click anchor.
    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // =========================================================================
    // Folding
    // =========================================================================

    /// Hides a column from view. Its data is untouched.
    pub fn fold_column(&mut self, name: &str) -> bool {
        if self.column_index(name).is_none() || self.is_folded(name) {
            return false;
        }
        self.folded.push(name.to_string());
        true
    }

    /// Shows a previously folded column.
    pub fn unfold_column(&mut self, name: &str) -> bool {
        let before = self.folded.len();
        self.folded.retain(|n| n != name);
        self.folded.len() != before
    }

    /// Returns `true` if the column is folded.
    pub fn is_folded(&self, name: &str) -> bool {
        self.folded.iter().any(|n| n == name)
    }

    /// Returns the folded column names.
    pub fn folded(&self) -> &[String] {
        &self.folded
    }
}
