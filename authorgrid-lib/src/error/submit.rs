//! Submission error types

/// Errors that can occur while handing the author list to a sink.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Failed to serialize the payload.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to write the payload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink refused the payload.
    #[error("Submission rejected: {0}")]
    Rejected(String),
}

impl SubmitError {
    /// Creates a new rejection error.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}
