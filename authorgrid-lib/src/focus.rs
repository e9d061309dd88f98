//! Text field focus and commit-on-change tracking.

use serde::Deserialize;
use serde::Serialize;

use crate::grid::Grid;
use crate::model::RowId;

/// The two text fields on every row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// The author name box.
    Author,
    /// The semicolon-separated affiliations box.
    Affiliations,
}

impl FieldKind {
    /// Returns the field's current text for a row.
    pub fn text_of(&self, grid: &Grid, row: RowId) -> Option<String> {
        let record = grid.record(row)?;
        Some(match self {
            Self::Author => record.author.clone(),
            Self::Affiliations => record.affiliation_text(),
        })
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Author => write!(f, "author"),
            Self::Affiliations => write!(f, "affiliations"),
        }
    }
}

/// A text field on a specific row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub row: RowId,
    pub kind: FieldKind,
}

/// Direction for keyboard focus moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// The focused field and the text it held when focus arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Focus {
    current: Option<(FieldRef, String)>,
}

impl Focus {
    /// Creates an unfocused state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Focuses a field, remembering its current text.
    ///
    /// Returns `false` if the row does not exist.
    pub fn enter(&mut self, grid: &Grid, field: FieldRef) -> bool {
        let Some(text) = field.kind.text_of(grid, field.row) else {
            return false;
        };
        self.current = Some((field, text));
        true
    }

    /// Clears focus and returns the field that had it.
    pub fn leave(&mut self) -> Option<FieldRef> {
        self.current.take().map(|(field, _)| field)
    }

    /// Returns the focused field.
    pub fn field(&self) -> Option<FieldRef> {
        self.current.as_ref().map(|(field, _)| *field)
    }

    /// Returns the text captured when the field was focused.
    pub fn captured(&self) -> Option<&str> {
        self.current.as_ref().map(|(_, text)| text.as_str())
    }

    /// Returns `true` if `field` has focus.
    pub fn is_focused(&self, field: FieldRef) -> bool {
        self.field() == Some(field)
    }

    /// Returns `true` if `text` differs from what the field held on focus.
    pub fn is_changed(&self, text: &str) -> bool {
        self.captured().is_some_and(|captured| captured != text)
    }

    /// Re-captures the focused field's text after it was committed.
    pub fn recapture(&mut self, grid: &Grid) {
        if let Some((field, text)) = &mut self.current {
            match field.kind.text_of(grid, field.row) {
                Some(fresh) => *text = fresh,
                None => self.current = None,
            }
        }
    }

    /// Returns the field one row up or down, staying on the current page.
    pub fn neighbour(&self, grid: &Grid, direction: Direction) -> Option<FieldRef> {
        let field = self.field()?;
        let index = grid.position(field.row)?;
        let visible = grid.visible_range();
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index + 1,
        };
        if !visible.contains(&target) {
            return None;
        }
        Some(FieldRef {
            row: grid.row_id(target)?,
            kind: field.kind,
        })
    }
}
