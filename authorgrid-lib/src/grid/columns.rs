//! Column discovery and filtering.

use crate::model::Record;

use super::Grid;

/// Counts, per column, the rows that contain that affiliation.
///
/// Presence is counted, not multiplicity.
pub fn usage_counts<'a>(
    rows: impl IntoIterator<Item = &'a Record>,
    columns: &[String],
) -> Vec<usize> {
    let mut counts = vec![0; columns.len()];
    for record in rows {
        for (i, column) in columns.iter().enumerate() {
            if record.has_affiliation(column) {
                counts[i] += 1;
            }
        }
    }
    counts
}

/// Rebuilds `columns` from the rows.
///
/// Unused columns are removed, affiliations present in rows but missing
/// from `columns` are appended, and the result is stably sorted by the
/// lowercase name.
pub fn filter_columns<'a>(
    columns: &mut Vec<String>,
    rows: impl IntoIterator<Item = &'a Record> + Clone,
) {
    let counts = usage_counts(rows.clone(), columns);
    let mut kept: Vec<String> = columns
        .drain(..)
        .zip(counts)
        .filter(|(name, count)| *count > 0 && !name.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

    for record in rows {
        for name in &record.affiliations {
            if !name.trim().is_empty() && !kept.contains(name) {
                kept.push(name.clone());
            }
        }
    }

    kept.sort_by_cached_key(|name| name.to_lowercase());
    *columns = kept;
}

impl Grid {
    /// Appends a column if it is non-blank and not yet present.
    ///
    /// Returns `true` if the column was created.
    pub(crate) fn add_column(&mut self, name: &str) -> bool {
        if name.trim().is_empty() || self.columns.iter().any(|c| c == name) {
            return false;
        }
        log::debug!("New column '{}'", name);
        self.columns.push(name.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unused_columns_are_dropped() {
        let rows = vec![Record::new("Alice", ["DESY"])];
        let mut columns = cols(&["CERN", "DESY"]);
        filter_columns(&mut columns, rows.iter());
        assert_eq!(columns, cols(&["DESY"]));
    }

    #[test]
    fn sort_ignores_case() {
        let rows = vec![Record::new("Alice", ["desy", "CERN", "Bonn"])];
        let mut columns = cols(&["desy", "CERN", "Bonn"]);
        filter_columns(&mut columns, rows.iter());
        assert_eq!(columns, cols(&["Bonn", "CERN", "desy"]));
    }

    #[test]
    fn missing_affiliations_gain_columns() {
        let rows = vec![Record::new("Alice", ["CERN"]), Record::new("Bob", ["SLAC"])];
        let mut columns = cols(&["CERN"]);
        filter_columns(&mut columns, rows.iter());
        assert_eq!(columns, cols(&["CERN", "SLAC"]));
    }

    #[test]
    fn counts_presence_per_row() {
        let rows = vec![
            Record::new("Alice", ["CERN", "CERN"]),
            Record::new("Bob", ["CERN", "DESY"]),
        ];
        let counts = usage_counts(rows.iter(), &cols(&["CERN", "DESY", "SLAC"]));
        assert_eq!(counts, vec![2, 1, 0]);
    }
}
