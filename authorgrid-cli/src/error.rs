//! CLI error type.

use std::path::PathBuf;

use authorgrid_lib::error::SubmitError;
use thiserror::Error;

/// Errors surfaced by the command-line front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("submit failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("logger error: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("{command}: {message}")]
    Usage { command: String, message: String },
}

impl CliError {
    /// Creates a usage error for a command.
    pub fn usage(command: &str, message: impl Into<String>) -> Self {
        Self::Usage {
            command: command.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` for errors the REPL reports and continues past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand(_) | Self::Usage { .. } | Self::Submit(_)
        )
    }
}
