//! Non-fatal warnings raised while editing

/// A user-visible warning about accepted but questionable input.
///
/// Warnings never block an edit. The grid queues them and the caller
/// drains them with [`Grid::take_warnings`](crate::grid::Grid::take_warnings).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridWarning {
    /// A row has affiliations but no author name.
    #[error(
        "Row {} has affiliations with no author name. Enter multiple affiliations for one author in the same box, separated by semicolons.",
        .row + 1
    )]
    MissingAuthor {
        /// Display index of the row at the time of the edit.
        row: usize,
    },
}

impl GridWarning {
    /// Creates a new missing author warning.
    pub fn missing_author(row: usize) -> Self {
        Self::MissingAuthor { row }
    }

    /// Returns the display row the warning refers to.
    pub fn row(&self) -> usize {
        match self {
            Self::MissingAuthor { row } => *row,
        }
    }
}
