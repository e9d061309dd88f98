//! Suggestion lookup error types

use std::time::Duration;

/// Errors from an autocomplete suggestion source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SuggestError {
    /// The source could not answer the query.
    #[error("Suggestion source unavailable: {0}")]
    Unavailable(String),

    /// The source did not answer in time.
    #[error("Suggestion lookup timed out after {0:?}")]
    Timeout(Duration),
}

impl SuggestError {
    /// Creates a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
