//! The editable author/affiliation grid.
//!
//! `Grid` owns the rows, the active affiliation columns, the cut buffer and
//! the pagination window. Rows are addressed by [`RowId`] internally; the
//! index-based methods translate a display position to an id first and are
//! no-ops when the position is out of range.

mod checkbox;
mod columns;
mod rows;
mod snapshot;

pub use checkbox::CellAnchor;
pub use columns::filter_columns;
pub use columns::usage_counts;
pub use snapshot::*;

use std::collections::HashMap;

use crate::config::GridConfig;
use crate::error::GridWarning;
use crate::model::Record;
use crate::model::RowId;
use crate::paging::Pager;

/// In-memory state of one author list editing session.
///
/// # Example
///
/// ```
/// use authorgrid_lib::grid::Grid;
/// use authorgrid_lib::model::Record;
///
/// let mut grid = Grid::load(vec![Record::new("Alice", ["CERN"])], Default::default());
/// grid.set_affiliations_from_text(0, "1; DESY");
/// grid.filter_columns();
///
/// assert_eq!(grid.columns(), ["CERN", "DESY"]);
/// ```
#[derive(Debug, Clone)]
pub struct Grid {
    /// Display order.
    order: Vec<RowId>,
    /// Row contents by id.
    records: HashMap<RowId, Record>,
    /// Active affiliation columns.
    columns: Vec<String>,
    /// Single-slot cut/copy buffer.
    clipboard: Option<Record>,
    /// Visible window.
    pager: Pager,
    /// Column names hidden from view.
    folded: Vec<String>,
    /// Last single-clicked checkbox, for shift-click ranges.
    anchor: Option<CellAnchor>,
    /// Warnings not yet shown to the user.
    warnings: Vec<GridWarning>,
    config: GridConfig,
}

impl Grid {
    /// Creates an empty grid with no rows and no columns.
    pub fn new(config: GridConfig) -> Self {
        Self {
            order: Vec::new(),
            records: HashMap::new(),
            columns: Vec::new(),
            clipboard: None,
            pager: Pager::new(config.page_size),
            folded: Vec::new(),
            anchor: None,
            warnings: Vec::new(),
            config,
        }
    }

    /// Creates a grid from stored records and runs the first discovery pass.
    ///
    /// Records are taken as-is (already escaped). An empty list yields a
    /// single empty row so there is always an author box to start typing in.
    pub fn load(records: Vec<Record>, config: GridConfig) -> Self {
        let mut grid = Self::new(config);
        if records.is_empty() {
            grid.push(Record::empty());
        } else {
            for record in records {
                grid.push(record);
            }
        }
        grid.filter_columns();
        log::debug!(
            "Loaded grid with {} rows and {} columns",
            grid.len(),
            grid.columns.len()
        );
        grid
    }

    fn push(&mut self, record: Record) -> RowId {
        let id = RowId::new();
        self.order.push(id);
        self.records.insert(id, record);
        id
    }

    pub(crate) fn insert_at(&mut self, position: usize, record: Record) -> RowId {
        let id = RowId::new();
        self.order.insert(position, id);
        self.records.insert(id, record);
        id
    }

    // =========================================================================
    // Row access
    // =========================================================================

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Translates a display index to a row id.
    pub fn row_id(&self, index: usize) -> Option<RowId> {
        self.order.get(index).copied()
    }

    /// Returns the current display index of a row.
    pub fn position(&self, id: RowId) -> Option<usize> {
        self.order.iter().position(|r| *r == id)
    }

    /// Returns `true` if the row is still in the grid.
    pub fn contains(&self, id: RowId) -> bool {
        self.records.contains_key(&id)
    }

    /// Returns a row by id.
    pub fn record(&self, id: RowId) -> Option<&Record> {
        self.records.get(&id)
    }

    /// Returns a row by display index.
    pub fn record_at(&self, index: usize) -> Option<&Record> {
        self.row_id(index).and_then(|id| self.records.get(&id))
    }

    pub(crate) fn record_mut(&mut self, id: RowId) -> Option<&mut Record> {
        self.records.get_mut(&id)
    }

    /// Iterates rows in display order.
    pub fn rows(&self) -> impl Iterator<Item = (RowId, &Record)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).map(|r| (*id, r)))
    }

    /// Returns the full row list in display order, for submission.
    pub fn serialize(&self) -> Vec<Record> {
        self.rows().map(|(_, r)| r.clone()).collect()
    }

    // =========================================================================
    // Columns and shared state
    // =========================================================================

    /// Returns the active columns.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the index of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Pairs each column with the number of rows using it.
    pub fn column_usage(&self) -> Vec<(String, usize)> {
        let counts = usage_counts(self.rows().map(|(_, r)| r), &self.columns);
        self.columns.iter().cloned().zip(counts).collect()
    }

    /// Returns the cut buffer contents.
    pub fn clipboard(&self) -> Option<&Record> {
        self.clipboard.as_ref()
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Returns the pagination window.
    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    /// Drains pending warnings.
    pub fn take_warnings(&mut self) -> Vec<GridWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Returns pending warnings without draining them.
    pub fn warnings(&self) -> &[GridWarning] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: GridWarning) {
        self.warnings.push(warning);
    }

    pub(crate) fn warn_if_missing_author(&mut self, id: RowId) {
        let lacks = self.records.get(&id).is_some_and(Record::lacks_author);
        if let (true, Some(row)) = (lacks, self.position(id)) {
            let warning = GridWarning::missing_author(row);
            log::warn!("{}", warning);
            self.push_warning(warning);
        }
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Advances one page. No-op on the last page.
    pub fn page_forward(&mut self) -> bool {
        let total = self.len();
        self.pager.page_forward(total)
    }

    /// Goes back one page. No-op on the first page.
    pub fn page_back(&mut self) -> bool {
        self.pager.page_back()
    }

    /// Sets the page size without touching the offset.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        self.pager.set_page_size(page_size)
    }

    /// Returns the half-open range of visible row indices.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        self.pager.visible_range(self.len())
    }

    /// Moves the window so that the row at `index` is visible.
    pub fn reveal(&mut self, index: usize) -> bool {
        index < self.len() && self.pager.reveal(index)
    }

    // =========================================================================
    // Post-edit pass
    // =========================================================================

    /// Re-derives the active column list from the rows.
    ///
    /// Columns no row uses are dropped, affiliations missing a column gain
    /// one, and the list is sorted case-insensitively. Folded names that no
    /// longer exist are forgotten.
    pub fn filter_columns(&mut self) {
        let rows: Vec<&Record> = self.order.iter().filter_map(|id| self.records.get(id)).collect();
        filter_columns(&mut self.columns, rows.iter().copied());
        let columns = &self.columns;
        self.folded.retain(|name| columns.contains(name));
        if let Some(anchor) = &self.anchor
            && !columns.contains(&anchor.column)
        {
            self.anchor = None;
        }
        log::trace!("Filtered columns: {:?}", self.columns);
    }

    /// Runs the pass that must follow every mutation: column filtering and
    /// clamping the page offset back into range.
    pub fn refresh(&mut self) {
        self.filter_columns();
        let total = self.len();
        if self.pager.clamp(total) {
            log::debug!("Clamped page offset to {}", self.pager.offset());
        }
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}
