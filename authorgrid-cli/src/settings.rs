//! Loading grid settings and input files.

use std::path::Path;

use authorgrid_lib::GridConfig;
use authorgrid_lib::model::Record;
use authorgrid_lib::submit::SubmitPayload;
use serde::Deserialize;

use crate::error::CliError;
use crate::paths;

/// Loads the grid configuration.
///
/// An explicit path must exist. Otherwise `config.json` in the platform
/// config directory is used when present, falling back to defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<GridConfig, CliError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match paths::config_file() {
        Some(path) if path.exists() => read_config(&path),
        _ => {
            log::debug!("No config file, using defaults");
            Ok(GridConfig::default())
        }
    }
}

fn read_config(path: &Path) -> Result<GridConfig, CliError> {
    let text = read(path)?;
    let config = GridConfig::from_json(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Author list input: either a bare row list or a saved payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AuthorInput {
    Rows(Vec<Record>),
    Payload(SubmitPayload),
}

/// Reads an author list, returning the rows and any stored record id.
pub fn load_authors(path: &Path) -> Result<(Vec<Record>, Option<u64>), CliError> {
    let text = read(path)?;
    let input: AuthorInput = serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match input {
        AuthorInput::Rows(rows) => (rows, None),
        AuthorInput::Payload(payload) => (payload.authors, payload.record_id),
    })
}

/// Reads a JSON array of institution names.
pub fn load_institutions(path: &Path) -> Result<Vec<String>, CliError> {
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"page_size": 5}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.min_query_len, 3);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn authors_load_from_rows_or_payload() {
        let dir = tempfile::tempdir().unwrap();

        let rows = dir.path().join("rows.json");
        std::fs::write(&rows, r#"[{"author": "Alice", "affiliations": ["CERN"]}]"#).unwrap();
        let (records, id) = load_authors(&rows).unwrap();
        assert_eq!(records, vec![Record::new("Alice", ["CERN"])]);
        assert_eq!(id, None);

        let payload = dir.path().join("payload.json");
        std::fs::write(
            &payload,
            r#"{"record_id": 9, "authors": [{"author": "Bob", "affiliations": []}]}"#,
        )
        .unwrap();
        let (records, id) = load_authors(&payload).unwrap();
        assert_eq!(records[0].author, "Bob");
        assert_eq!(id, Some(9));
    }

    #[test]
    fn bad_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").unwrap();
        let err = load_authors(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
