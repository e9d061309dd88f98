//! Grid configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Tunables for the editing session.
///
/// Every field has a default, so a partial JSON document is a valid config.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use authorgrid_lib::config::GridConfig;
///
/// let config = GridConfig::default()
///     .with_page_size(50)
///     .with_suggest_timeout(Duration::from_millis(500));
///
/// assert_eq!(config.page_size, 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Rows shown per page.
    ///
    /// Default: 25
    pub page_size: usize,

    /// Minimum length of the last affiliation segment before a
    /// suggestion lookup is issued.
    ///
    /// Default: 3
    pub min_query_len: usize,

    /// Column labels longer than this are truncated in headers.
    ///
    /// Default: 10
    pub header_label_max: usize,

    /// Characters kept from a truncated label (before the `...`).
    ///
    /// Default: 7
    pub header_label_keep: usize,

    /// Drop repeated affiliations within one row when parsing text.
    ///
    /// Default: true
    pub dedup_affiliations: bool,

    /// Upper bound on a single suggestion lookup, in milliseconds.
    ///
    /// Default: 2000
    pub suggest_timeout_ms: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            min_query_len: 3,
            header_label_max: 10,
            header_label_keep: 7,
            dedup_affiliations: true,
            suggest_timeout_ms: 2000,
        }
    }
}

impl GridConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Sets the page size. Values below 1 are raised to 1.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the minimum suggestion query length.
    pub fn with_min_query_len(mut self, len: usize) -> Self {
        self.min_query_len = len;
        self
    }

    /// Sets the header label truncation widths.
    pub fn with_header_label(mut self, max: usize, keep: usize) -> Self {
        self.header_label_max = max;
        self.header_label_keep = keep.min(max);
        self
    }

    /// Enables or disables per-row affiliation dedup.
    pub fn with_dedup_affiliations(mut self, dedup: bool) -> Self {
        self.dedup_affiliations = dedup;
        self
    }

    /// Sets the suggestion lookup timeout.
    pub fn with_suggest_timeout(mut self, timeout: Duration) -> Self {
        self.suggest_timeout_ms = timeout.as_millis().try_into().unwrap_or(u64::MAX);
        self
    }

    /// Returns the suggestion lookup timeout.
    pub fn suggest_timeout(&self) -> Duration {
        Duration::from_millis(self.suggest_timeout_ms)
    }

    fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.header_label_keep = self.header_label_keep.min(self.header_label_max);
        self
    }
}
