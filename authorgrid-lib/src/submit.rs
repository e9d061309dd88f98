//! Packaging the edited author list for saving.

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::error::SubmitError;
use crate::grid::Grid;
use crate::model::Record;

/// The author list of one bibliographic record, ready to save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitPayload {
    /// Identifier of the record being edited, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<u64>,
    /// Every row, in display order.
    pub authors: Vec<Record>,
}

impl SubmitPayload {
    /// Captures the grid's full row list.
    pub fn from_grid(grid: &Grid, record_id: Option<u64>) -> Self {
        Self {
            record_id,
            authors: grid.serialize(),
        }
    }

    /// Encodes the payload as classic form fields.
    ///
    /// Row `i` becomes `autho{i}` (name) and `insts{i}` (affiliation text),
    /// followed by a single `recid` field.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.authors.len() * 2 + 1);
        for (i, record) in self.authors.iter().enumerate() {
            fields.push((format!("autho{i}"), record.author.clone()));
            fields.push((format!("insts{i}"), record.affiliation_text()));
        }
        let recid = self.record_id.map(|id| id.to_string()).unwrap_or_default();
        fields.push(("recid".to_string(), recid));
        fields
    }

    /// The main author (first row).
    pub fn first_author(&self) -> Option<&Record> {
        self.authors.first()
    }

    /// Every author after the first.
    pub fn additional_authors(&self) -> &[Record] {
        self.authors.get(1..).unwrap_or_default()
    }

    /// Rows that have affiliations but no author name.
    pub fn rows_missing_author(&self) -> Vec<usize> {
        self.authors
            .iter()
            .enumerate()
            .filter(|(_, r)| r.lacks_author())
            .map(|(i, _)| i)
            .collect()
    }

    /// Serializes the payload as pretty JSON.
    pub fn to_json(&self) -> Result<String, SubmitError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Destination for saved author lists.
#[async_trait]
pub trait SubmitSink: Send + Sync {
    async fn submit(&self, payload: &SubmitPayload) -> Result<(), SubmitError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> SubmitPayload {
        SubmitPayload {
            record_id: Some(42),
            authors: vec![
                Record::new("Alice", ["CERN", "DESY"]),
                Record::new("", ["Fermilab"]),
            ],
        }
    }

    #[test]
    fn form_fields_number_rows_from_zero() {
        let fields = payload().form_fields();
        assert_eq!(
            fields,
            vec![
                ("autho0".to_string(), "Alice".to_string()),
                ("insts0".to_string(), "CERN;DESY;".to_string()),
                ("autho1".to_string(), String::new()),
                ("insts1".to_string(), "Fermilab;".to_string()),
                ("recid".to_string(), "42".to_string()),
            ]
        );
    }

    #[test]
    fn splits_first_and_additional_authors() {
        let payload = payload();
        assert_eq!(payload.first_author().map(|r| r.author.as_str()), Some("Alice"));
        assert_eq!(payload.additional_authors().len(), 1);
        assert_eq!(payload.rows_missing_author(), vec![1]);
    }

    #[test]
    fn empty_payload_has_no_additional_authors() {
        let payload = SubmitPayload {
            record_id: None,
            authors: Vec::new(),
        };
        assert!(payload.first_author().is_none());
        assert!(payload.additional_authors().is_empty());
        assert_eq!(payload.form_fields(), vec![("recid".to_string(), String::new())]);
    }
}
