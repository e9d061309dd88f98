//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "authorgrid";
const APPLICATION: &str = "authorgrid";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 25;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Directory for saved author lists.
///
/// - Linux: `$XDG_DATA_HOME/authorgrid` or `~/.local/share/authorgrid`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Directory for logs.
///
/// - Linux: `$XDG_CACHE_HOME/authorgrid` or `~/.cache/authorgrid`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding `config.json`.
///
/// - Linux: `$XDG_CONFIG_HOME/authorgrid` or `~/.config/authorgrid`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default grid settings file.
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

/// Default destination for submitted author lists.
pub fn default_output(record_id: Option<u64>) -> Option<PathBuf> {
    let name = match record_id {
        Some(id) => format!("authors_{id}.json"),
        None => "authors.json".to_string(),
    };
    data_dir().map(|dir| dir.join(name))
}

/// Path of the current log file.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Archives `latest.log` under a timestamp and prunes old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache);
}

fn rotate_logs_in(dir: &Path) {
    let latest = dir.join("latest.log");
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, dir.join(format!("{timestamp}.log")));
    }
    cleanup_old_logs(dir, MAX_OLD_LOGS);
}

/// Removes archived logs beyond `keep`, oldest first.
fn cleanup_old_logs(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    if logs.len() <= keep {
        return;
    }
    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    for entry in logs.iter().take(logs.len() - keep) {
        let _ = fs::remove_file(entry.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_archives_latest_log() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("latest.log"), "old run").unwrap();

        rotate_logs_in(dir.path());

        assert!(!dir.path().join("latest.log").exists());
        let archived: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(archived.len(), 1);
    }

    #[test]
    fn cleanup_keeps_newest_archives() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("2024010{i}_000000.log")), "x").unwrap();
        }
        fs::write(dir.path().join("notes.txt"), "keep me").unwrap();

        cleanup_old_logs(dir.path(), 2);

        let logs = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count();
        assert_eq!(logs, 2);
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn output_name_includes_record_id() {
        if let Some(path) = default_output(Some(12)) {
            assert!(path.ends_with("authors_12.json"));
        }
    }
}
