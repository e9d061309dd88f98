//! Row mutations: insert, cut, copy, paste and text edits.

use crate::model::Record;
use crate::model::RowId;
use crate::model::text::escape_html;
use crate::model::text::text_to_affiliations;

use super::Grid;

/// Parses a shorthand column reference (`"2"` means the second column).
///
/// Only plain ASCII digits count; anything else is an affiliation name.
fn parse_shorthand(token: &str, column_count: usize) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=column_count).contains(n))
}

impl Grid {
    // =========================================================================
    // Structural edits (by id)
    // =========================================================================

    /// Inserts an empty row after `after`, or at the head for `None`.
    ///
    /// Returns `None` if `after` is no longer in the grid.
    pub fn insert_after_row(&mut self, after: Option<RowId>) -> Option<RowId> {
        self.insert_record_after(after, Record::empty())
    }

    fn insert_record_after(&mut self, after: Option<RowId>, record: Record) -> Option<RowId> {
        let position = match after {
            Some(id) => self.position(id)? + 1,
            None => 0,
        };
        let id = self.insert_at(position, record);
        log::debug!("Inserted row {} at {}", id, position);
        Some(id)
    }

    /// Moves a row into the cut buffer and removes it from the grid.
    pub fn cut(&mut self, id: RowId) -> Option<Record> {
        let position = self.position(id)?;
        self.order.remove(position);
        let record = self.records.remove(&id)?;
        if self.anchor.as_ref().is_some_and(|a| a.row == id) {
            self.anchor = None;
        }
        self.clipboard = Some(record.clone());
        log::debug!("Cut row {} from {}", id, position);
        Some(record)
    }

    /// Copies a row into the cut buffer.
    pub fn copy(&mut self, id: RowId) -> bool {
        let Some(record) = self.records.get(&id) else {
            return false;
        };
        self.clipboard = Some(record.clone());
        log::debug!("Copied row {}", id);
        true
    }

    /// Inserts a copy of the cut buffer after `after`, or at the head for `None`.
    ///
    /// The pasted row is independent of the buffer and gets a new id.
    pub fn paste_after_row(&mut self, after: Option<RowId>) -> Option<RowId> {
        let record = self.clipboard.clone()?;
        self.insert_record_after(after, record)
    }

    // =========================================================================
    // Field edits (by id)
    // =========================================================================

    /// Trims, escapes and stores an author name.
    ///
    /// A blank author on a row with affiliations queues a warning but is
    /// still stored.
    pub fn set_author(&mut self, id: RowId, raw: &str) -> bool {
        let author = escape_html(raw.trim());
        let Some(record) = self.record_mut(id) else {
            return false;
        };
        let changed = record.author != author;
        record.author = author;
        self.warn_if_missing_author(id);
        changed
    }

    /// Replaces a row's affiliations with the parsed contents of `raw`.
    ///
    /// Each `;`-separated segment is either a shorthand column number,
    /// resolved against the current columns, or an affiliation name that
    /// becomes a new column if unseen. Run [`Grid::filter_columns`]
    /// afterwards to drop columns that lost their last user.
    pub fn set_affiliation_text(&mut self, id: RowId, raw: &str) -> bool {
        if !self.contains(id) {
            return false;
        }

        let mut resolved: Vec<String> = Vec::new();
        for token in text_to_affiliations(raw) {
            let name = match parse_shorthand(&token, self.columns.len()) {
                Some(n) => self.columns[n - 1].clone(),
                None => {
                    self.add_column(&token);
                    token
                }
            };
            if self.config.dedup_affiliations && resolved.contains(&name) {
                continue;
            }
            resolved.push(name);
        }

        let Some(record) = self.record_mut(id) else {
            return false;
        };
        let changed = record.affiliations != resolved;
        record.affiliations = resolved;
        self.warn_if_missing_author(id);
        changed
    }

    // =========================================================================
    // Display-index operations
    // =========================================================================

    /// Inserts an empty row after display index `after` (`None` = head).
    ///
    /// No-op if `after` is out of range.
    pub fn insert_row_after(&mut self, after: Option<usize>) -> Option<RowId> {
        match after {
            Some(index) => {
                let id = self.row_id(index)?;
                self.insert_after_row(Some(id))
            }
            None => self.insert_after_row(None),
        }
    }

    /// Cuts the row at `index` into the cut buffer.
    pub fn delete_row(&mut self, index: usize) -> Option<Record> {
        let id = self.row_id(index)?;
        self.cut(id)
    }

    /// Copies the row at `index` into the cut buffer.
    pub fn copy_row(&mut self, index: usize) -> bool {
        self.row_id(index).is_some_and(|id| self.copy(id))
    }

    /// Pastes the cut buffer after display index `after` (`None` = head).
    pub fn paste_after(&mut self, after: Option<usize>) -> Option<RowId> {
        self.clipboard.as_ref()?;
        match after {
            Some(index) => {
                let id = self.row_id(index)?;
                self.paste_after_row(Some(id))
            }
            None => self.paste_after_row(None),
        }
    }

    /// Sets the author of the row at `index`.
    pub fn set_author_name(&mut self, index: usize, raw: &str) -> bool {
        self.row_id(index).is_some_and(|id| self.set_author(id, raw))
    }

    /// Parses affiliation text into the row at `index`.
    pub fn set_affiliations_from_text(&mut self, index: usize, raw: &str) -> bool {
        self.row_id(index)
            .is_some_and(|id| self.set_affiliation_text(id, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_accepts_only_digits_in_range() {
        assert_eq!(parse_shorthand("1", 2), Some(1));
        assert_eq!(parse_shorthand("02", 2), Some(2));
        assert_eq!(parse_shorthand("3", 2), None);
        assert_eq!(parse_shorthand("0", 2), None);
        assert_eq!(parse_shorthand("1a", 2), None);
        assert_eq!(parse_shorthand("1.0", 2), None);
        assert_eq!(parse_shorthand("-1", 2), None);
    }
}
