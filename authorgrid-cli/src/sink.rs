//! Submit sink writing the author list to a JSON file.

use std::path::PathBuf;

use async_trait::async_trait;
use authorgrid_lib::error::SubmitError;
use authorgrid_lib::submit::SubmitPayload;
use authorgrid_lib::submit::SubmitSink;

/// Writes each submitted payload to a file, replacing earlier saves.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SubmitSink for JsonFileSink {
    async fn submit(&self, payload: &SubmitPayload) -> Result<(), SubmitError> {
        if payload.authors.iter().all(|r| r.is_blank()) {
            return Err(SubmitError::rejected("author list is empty"));
        }
        let json = payload.to_json()?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, json).await?;
        log::info!(
            "Saved {} authors to {}",
            payload.authors.len(),
            self.path.display()
        );
        Ok(())
    }
}
