//! Read-only view of the grid for renderers.

use serde::Serialize;

use crate::model::RowId;
use crate::paging::PageInfo;

use super::Grid;
use super::usage_counts;

/// Everything a renderer needs to draw the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Rows on the current page.
    pub rows: Vec<RowView>,
    /// Active columns in display order.
    pub columns: Vec<ColumnHeader>,
    /// Pagination state.
    pub pagination: PageInfo,
}

/// One visible row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub id: RowId,
    /// Absolute display index (0-based).
    pub index: usize,
    pub author: String,
    /// Semicolon box text derived from the affiliation list.
    pub affiliation_text: String,
    pub affiliations: Vec<String>,
    /// One flag per entry of [`Snapshot::columns`].
    pub checked: Vec<bool>,
}

/// Header cell for an affiliation column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnHeader {
    /// 1-based column number, also the shorthand that refers to it.
    pub number: usize,
    pub name: String,
    /// Name shortened for the header.
    pub label: String,
    /// Rows that have this affiliation.
    pub usage: usize,
    pub folded: bool,
}

/// Shortens `name` to `keep` characters plus `...` when longer than `max`.
pub fn truncate_label(name: &str, max: usize, keep: usize) -> String {
    if name.chars().count() > max {
        let head: String = name.chars().take(keep).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

impl Snapshot {
    /// Returns `true` if the given column is checked on the given visible row.
    pub fn is_checked(&self, row: usize, column: &str) -> bool {
        let Some(col) = self.columns.iter().position(|c| c.name == column) else {
            return false;
        };
        self.rows
            .iter()
            .find(|r| r.index == row)
            .and_then(|r| r.checked.get(col).copied())
            .unwrap_or(false)
    }
}

impl Grid {
    /// Builds the render view of the current page.
    pub fn snapshot(&self) -> Snapshot {
        let total = self.len();
        let range = self.visible_range();
        let config = self.config();

        let counts = usage_counts(self.rows().map(|(_, r)| r), self.columns());
        let columns = self
            .columns()
            .iter()
            .zip(counts)
            .enumerate()
            .map(|(i, (name, usage))| ColumnHeader {
                number: i + 1,
                name: name.clone(),
                label: truncate_label(name, config.header_label_max, config.header_label_keep),
                usage,
                folded: self.is_folded(name),
            })
            .collect();

        let rows = range
            .filter_map(|index| {
                let id = self.row_id(index)?;
                let record = self.record(id)?;
                Some(RowView {
                    id,
                    index,
                    author: record.author.clone(),
                    affiliation_text: record.affiliation_text(),
                    affiliations: record.affiliations.clone(),
                    checked: self
                        .columns()
                        .iter()
                        .map(|c| record.has_affiliation(c))
                        .collect(),
                })
            })
            .collect();

        Snapshot {
            rows,
            columns,
            pagination: self.pager().info(total),
        }
    }
}
