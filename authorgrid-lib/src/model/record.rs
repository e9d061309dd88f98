//! Author record

use serde::Deserialize;
use serde::Serialize;

use super::text::affiliations_to_text;
use super::text::escape_html;
use super::text::text_to_affiliations;

/// One author and the ordered list of institutions they are affiliated with.
///
/// Values held by a record are already escaped. Use [`Record::from_input`]
/// for raw user text and [`Record::new`] for data that was stored before.
///
/// # Example
///
/// ```
/// use authorgrid_lib::model::Record;
///
/// let record = Record::from_input(" Alice ", "CERN; DESY");
///
/// assert_eq!(record.author, "Alice");
/// assert_eq!(record.affiliation_text(), "CERN;DESY;");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The author name, trimmed and escaped.
    #[serde(default)]
    pub author: String,

    /// Affiliation names in insertion order.
    #[serde(default)]
    pub affiliations: Vec<String>,
}

impl Record {
    /// Creates a record from already-accepted values.
    pub fn new<S: Into<String>>(author: impl Into<String>, affiliations: impl IntoIterator<Item = S>) -> Self {
        Self {
            author: author.into(),
            affiliations: affiliations.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a record from raw user input, escaping both fields.
    pub fn from_input(author: &str, affiliation_text: &str) -> Self {
        Self {
            author: escape_html(author.trim()),
            affiliations: text_to_affiliations(affiliation_text),
        }
    }

    /// Creates an empty record (the "new row" placeholder).
    pub fn empty() -> Self {
        Self::default()
    }

    // =========================================================================
    // Derived views
    // =========================================================================

    /// Returns the affiliations as semicolon box text.
    pub fn affiliation_text(&self) -> String {
        affiliations_to_text(&self.affiliations)
    }

    /// Returns `true` if the affiliation is present.
    pub fn has_affiliation(&self, name: &str) -> bool {
        self.affiliations.iter().any(|a| a == name)
    }

    /// Returns `true` if the record has neither author nor affiliations.
    pub fn is_blank(&self) -> bool {
        self.author.is_empty() && self.affiliations.is_empty()
    }

    /// Returns `true` if the record has affiliations but no author.
    pub fn lacks_author(&self) -> bool {
        self.author.is_empty() && !self.affiliations.is_empty()
    }

    // =========================================================================
    // Checkbox edits
    // =========================================================================

    /// Appends the affiliation if missing. Returns `true` on change.
    pub(crate) fn check(&mut self, name: &str) -> bool {
        if self.has_affiliation(name) {
            return false;
        }
        self.affiliations.push(name.to_string());
        true
    }

    /// Removes the first occurrence of the affiliation. Returns `true` on change.
    pub(crate) fn uncheck(&mut self, name: &str) -> bool {
        match self.affiliations.iter().position(|a| a == name) {
            Some(pos) => {
                self.affiliations.remove(pos);
                true
            }
            None => false,
        }
    }
}
