//! Autocomplete suggestions for the text fields.
//!
//! Lookups are the only asynchronous step in an editing session. A lookup
//! is tagged with a [`SuggestionRequest`] ticket. A newer ticket for the
//! same field supersedes older ones, and the session refuses to apply a
//! result whose ticket is stale, whose field lost focus, or whose row is
//! gone.

mod cache;
mod filter;

pub use cache::*;
pub use filter::*;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::GridConfig;
use crate::error::SuggestError;
use crate::focus::FieldKind;
use crate::focus::FieldRef;
use crate::model::text::last_segment;

/// A source of completion candidates, such as an institutions knowledge base.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    /// Returns candidates for `query`, best first.
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError>;
}

/// Ticket for one in-flight lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    /// Field the lookup was issued for.
    pub field: FieldRef,
    /// Full field text when the lookup was issued.
    pub text: String,
    /// Text sent to the source.
    pub query: String,
    generation: u64,
}

impl SuggestionRequest {
    /// Returns the ticket's sequence number.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues lookup tickets and tracks which one is current per field.
#[derive(Debug, Clone)]
pub struct SuggestionBroker {
    latest: HashMap<FieldRef, u64>,
    next: u64,
    min_query_len: usize,
    timeout: Duration,
}

impl SuggestionBroker {
    /// Creates a broker using the config's query length and timeout.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            latest: HashMap::new(),
            next: 0,
            min_query_len: config.min_query_len,
            timeout: config.suggest_timeout(),
        }
    }

    /// Returns the query a field's text would send.
    ///
    /// The affiliations box only completes the segment after the last `;`.
    pub fn query_for(kind: FieldKind, text: &str) -> &str {
        match kind {
            FieldKind::Author => text.trim(),
            FieldKind::Affiliations => last_segment(text),
        }
    }

    /// Issues a ticket for `field`, superseding any earlier one.
    ///
    /// Returns `None` when the query is shorter than the configured minimum.
    pub fn issue(&mut self, field: FieldRef, text: &str) -> Option<SuggestionRequest> {
        let query = Self::query_for(field.kind, text);
        if query.chars().count() < self.min_query_len {
            return None;
        }
        self.next += 1;
        self.latest.insert(field, self.next);
        log::trace!("Suggestion ticket {} for {} '{}'", self.next, field.kind, query);
        Some(SuggestionRequest {
            field,
            text: text.to_string(),
            query: query.to_string(),
            generation: self.next,
        })
    }

    /// Returns `true` if no newer ticket was issued for the request's field.
    pub fn is_current(&self, request: &SuggestionRequest) -> bool {
        self.latest.get(&request.field) == Some(&request.generation)
    }

    /// Forgets all tickets for a field.
    pub fn retire(&mut self, field: FieldRef) {
        self.latest.remove(&field);
    }

    /// Forgets every ticket.
    pub fn clear(&mut self) {
        self.latest.clear();
    }

    /// Runs the lookup with the configured timeout.
    ///
    /// Failures and timeouts are logged and yield no candidates, leaving the
    /// field unchanged.
    pub async fn lookup<S>(&self, source: &S, request: &SuggestionRequest) -> Vec<String>
    where
        S: SuggestionSource + ?Sized,
    {
        let result = match tokio::time::timeout(self.timeout, source.suggest(&request.query)).await {
            Ok(result) => result,
            Err(_) => Err(SuggestError::Timeout(self.timeout)),
        };
        match result {
            Ok(candidates) => candidates,
            Err(e) => {
                log::warn!("Suggestion lookup for '{}' failed: {}", request.query, e);
                Vec::new()
            }
        }
    }
}

impl Default for SuggestionBroker {
    fn default() -> Self {
        Self::new(&GridConfig::default())
    }
}
