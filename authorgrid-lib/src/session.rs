//! The editing session: the grid plus focus and suggestion tracking.

use crate::config::GridConfig;
use crate::error::GridWarning;
use crate::error::SubmitError;
use crate::focus::Direction;
use crate::focus::FieldKind;
use crate::focus::FieldRef;
use crate::focus::Focus;
use crate::grid::Grid;
use crate::grid::Snapshot;
use crate::model::Record;
use crate::model::RowId;
use crate::model::text::merge_suggestion;
use crate::submit::SubmitPayload;
use crate::submit::SubmitSink;
use crate::suggest::SuggestionBroker;
use crate::suggest::SuggestionRequest;
use crate::suggest::SuggestionSource;

/// One author list being edited.
///
/// Every action mutates the grid and then re-runs column filtering and the
/// page clamp before returning, so [`Session::snapshot`] is always
/// consistent.
///
/// # Example
///
/// ```
/// use authorgrid_lib::focus::FieldKind;
/// use authorgrid_lib::model::Record;
/// use authorgrid_lib::Session;
///
/// let mut session = Session::load(vec![Record::new("Alice", ["CERN"])], Default::default());
/// session.focus(0, FieldKind::Affiliations);
/// session.commit("CERN; DESY");
///
/// assert_eq!(session.grid().columns(), ["CERN", "DESY"]);
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    grid: Grid,
    focus: Focus,
    broker: SuggestionBroker,
}

impl Session {
    /// Starts a session over an existing grid.
    pub fn new(mut grid: Grid) -> Self {
        let broker = SuggestionBroker::new(grid.config());
        grid.refresh();
        Self {
            grid,
            focus: Focus::new(),
            broker,
        }
    }

    /// Starts a session from stored records.
    pub fn load(records: Vec<Record>, config: GridConfig) -> Self {
        Self::new(Grid::load(records, config))
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the focused field.
    pub fn focused(&self) -> Option<FieldRef> {
        self.focus.field()
    }

    /// Returns the text the focused field held when it gained focus.
    pub fn captured_text(&self) -> Option<&str> {
        self.focus.captured()
    }

    /// Builds the render view.
    pub fn snapshot(&self) -> Snapshot {
        self.grid.snapshot()
    }

    /// Drains pending warnings.
    pub fn take_warnings(&mut self) -> Vec<GridWarning> {
        self.grid.take_warnings()
    }

    /// Returns every row in display order.
    pub fn serialize(&self) -> Vec<Record> {
        self.grid.serialize()
    }

    /// Packages the rows for saving.
    pub fn payload(&self, record_id: Option<u64>) -> SubmitPayload {
        SubmitPayload::from_grid(&self.grid, record_id)
    }

    fn finish(&mut self) {
        self.grid.refresh();
        self.focus.recapture(&self.grid);
    }

    // =========================================================================
    // Row actions
    // =========================================================================

    /// Inserts an empty row after `after` (`None` = head) and focuses its
    /// author box.
    pub fn insert_row_after(&mut self, after: Option<usize>) -> Option<RowId> {
        let id = self.grid.insert_row_after(after)?;
        if let Some(index) = self.grid.position(id) {
            self.grid.reveal(index);
        }
        self.focus.enter(
            &self.grid,
            FieldRef {
                row: id,
                kind: FieldKind::Author,
            },
        );
        self.finish();
        Some(id)
    }

    /// Cuts the row at `index`.
    ///
    /// Focus moves to the row that takes its place, or to the new last row
    /// when the last row was cut.
    pub fn delete_row(&mut self, index: usize) -> Option<Record> {
        let id = self.grid.row_id(index)?;
        let kind = self.focus.field().map_or(FieldKind::Author, |f| f.kind);
        let record = self.grid.cut(id)?;
        self.broker.retire(FieldRef {
            row: id,
            kind: FieldKind::Author,
        });
        self.broker.retire(FieldRef {
            row: id,
            kind: FieldKind::Affiliations,
        });

        self.focus.leave();
        let next = index.min(self.grid.len().saturating_sub(1));
        if let Some(row) = self.grid.row_id(next) {
            self.focus.enter(&self.grid, FieldRef { row, kind });
        }
        self.finish();
        Some(record)
    }

    /// Copies the row at `index` into the cut buffer.
    pub fn copy_row(&mut self, index: usize) -> bool {
        self.grid.copy_row(index)
    }

    /// Pastes the cut buffer after `after` (`None` = head).
    pub fn paste_after(&mut self, after: Option<usize>) -> Option<RowId> {
        let id = self.grid.paste_after(after)?;
        self.finish();
        Some(id)
    }

    /// Sets the author of the row at `index`.
    pub fn set_author_name(&mut self, index: usize, raw: &str) -> bool {
        let changed = self.grid.set_author_name(index, raw);
        self.finish();
        changed
    }

    /// Parses affiliation text into the row at `index`.
    pub fn set_affiliations_from_text(&mut self, index: usize, raw: &str) -> bool {
        let changed = self.grid.set_affiliations_from_text(index, raw);
        self.finish();
        changed
    }

    /// Sets one checkbox.
    pub fn toggle_checkbox(&mut self, index: usize, column: &str, checked: bool) -> bool {
        let changed = self.grid.toggle_checkbox(index, column, checked);
        self.finish();
        changed
    }

    /// Sets every checkbox in a rectangle.
    pub fn toggle_checkbox_range(
        &mut self,
        row1: usize,
        col1: usize,
        row2: usize,
        col2: usize,
        checked: bool,
    ) -> usize {
        let changed = self.grid.toggle_checkbox_range(row1, col1, row2, col2, checked);
        self.finish();
        changed
    }

    /// Handles a (possibly shift-) click on a checkbox.
    pub fn click_checkbox(&mut self, row: usize, col: usize, checked: bool, shift: bool) -> usize {
        let changed = self.grid.click_checkbox(row, col, checked, shift);
        self.finish();
        changed
    }

    /// Hides a column. Range toggles skip it.
    pub fn fold_column(&mut self, name: &str) -> bool {
        self.grid.fold_column(name)
    }

    /// Shows a folded column again.
    pub fn unfold_column(&mut self, name: &str) -> bool {
        self.grid.unfold_column(name)
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Advances one page. No-op on the last page.
    pub fn page_forward(&mut self) -> bool {
        let moved = self.grid.page_forward();
        self.finish();
        moved
    }

    /// Goes back one page. No-op on the first page.
    pub fn page_back(&mut self) -> bool {
        let moved = self.grid.page_back();
        self.finish();
        moved
    }

    /// Changes the page size; the offset is clamped afterwards.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let changed = self.grid.set_page_size(page_size);
        self.finish();
        changed
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Focuses a text field on the row at `index`.
    pub fn focus(&mut self, index: usize, kind: FieldKind) -> bool {
        let Some(row) = self.grid.row_id(index) else {
            return false;
        };
        if let Some(previous) = self.focus.field() {
            self.broker.retire(previous);
        }
        self.focus.enter(&self.grid, FieldRef { row, kind })
    }

    /// Commits the focused field's text if it changed since focus.
    ///
    /// Returns `true` if anything was written.
    pub fn commit(&mut self, text: &str) -> bool {
        let Some(field) = self.focus.field() else {
            return false;
        };
        if !self.focus.is_changed(text) {
            return false;
        }
        let changed = match field.kind {
            FieldKind::Author => self.grid.set_author(field.row, text),
            FieldKind::Affiliations => self.grid.set_affiliation_text(field.row, text),
        };
        log::debug!("Committed {} on {}", field.kind, field.row);
        self.finish();
        changed
    }

    /// Clears focus. Pending suggestions for the field become stale.
    pub fn blur(&mut self) -> Option<FieldRef> {
        let field = self.focus.leave()?;
        self.broker.retire(field);
        Some(field)
    }

    /// Moves focus to the same field one row up or down on this page.
    pub fn move_focus(&mut self, direction: Direction) -> bool {
        let Some(target) = self.focus.neighbour(&self.grid, direction) else {
            return false;
        };
        if let Some(previous) = self.focus.field() {
            self.broker.retire(previous);
        }
        self.focus.enter(&self.grid, target)
    }

    // =========================================================================
    // Suggestions
    // =========================================================================

    /// Issues a lookup ticket for the focused field's current text.
    pub fn request_suggestions(&mut self, text: &str) -> Option<SuggestionRequest> {
        let field = self.focus.field()?;
        self.broker.issue(field, text)
    }

    /// Runs a lookup for a ticket. Failures yield no candidates.
    pub async fn suggestions<S>(&self, source: &S, request: &SuggestionRequest) -> Vec<String>
    where
        S: SuggestionSource + ?Sized,
    {
        self.broker.lookup(source, request).await
    }

    /// Applies an accepted suggestion.
    ///
    /// Ignored unless the ticket is still the latest for its field, the
    /// field still has focus and the row still exists.
    pub fn apply_suggestion(&mut self, request: &SuggestionRequest, value: &str) -> bool {
        let field = request.field;
        if !self.broker.is_current(request)
            || !self.focus.is_focused(field)
            || !self.grid.contains(field.row)
        {
            log::debug!("Discarding stale suggestion '{}' for {}", value, field.kind);
            return false;
        }
        self.broker.retire(field);
        self.write_suggestion(field, &request.text, value)
    }

    /// Applies a suggestion addressed by row index.
    ///
    /// The row at `index` must be the ticket's row, and the checks of
    /// [`Session::apply_suggestion`] must pass.
    pub fn apply_suggestion_at(
        &mut self,
        index: usize,
        request: &SuggestionRequest,
        value: &str,
    ) -> bool {
        if self.grid.row_id(index) != Some(request.field.row) {
            log::debug!("Discarding suggestion '{}': row {} moved", value, index);
            return false;
        }
        self.apply_suggestion(request, value)
    }

    fn write_suggestion(&mut self, field: FieldRef, text: &str, value: &str) -> bool {
        let changed = match field.kind {
            FieldKind::Author => self.grid.set_author(field.row, value),
            FieldKind::Affiliations => {
                let merged = merge_suggestion(text, value);
                self.grid.set_affiliation_text(field.row, &merged)
            }
        };
        self.finish();
        changed
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sends the rows to `sink`.
    ///
    /// Rows with affiliations but no author are reported as warnings; the
    /// save goes ahead regardless.
    pub async fn submit<K>(
        &mut self,
        sink: &K,
        record_id: Option<u64>,
    ) -> Result<SubmitPayload, SubmitError>
    where
        K: SubmitSink + ?Sized,
    {
        let payload = self.payload(record_id);
        for row in payload.rows_missing_author() {
            let warning = GridWarning::missing_author(row);
            log::warn!("{}", warning);
            self.grid.push_warning(warning);
        }
        sink.submit(&payload).await?;
        log::debug!("Submitted {} authors", payload.authors.len());
        Ok(payload)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::load(Vec::new(), GridConfig::default())
    }
}
