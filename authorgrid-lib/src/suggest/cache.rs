//! Memoizing wrapper for slow suggestion sources.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use dashmap::DashMap;

use super::SuggestionSource;
use crate::error::SuggestError;

/// Cached candidates for one query.
#[derive(Debug, Clone)]
struct CachedCandidates {
    values: Vec<String>,
    expires_at: DateTime<Utc>,
}

impl CachedCandidates {
    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Wraps a [`SuggestionSource`] and remembers answers per query for a TTL.
///
/// Queries are keyed case-insensitively. Failed lookups are not cached.
#[derive(Debug)]
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    store: DashMap<String, CachedCandidates>,
}

impl<S: SuggestionSource> CachedSource<S> {
    /// Creates a cache in front of `inner`.
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            store: DashMap::new(),
        }
    }

    /// Returns the wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the number of cached queries (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drops every cached answer.
    pub fn clear(&self) {
        self.store.clear();
    }

    /// Removes expired answers and returns how many were dropped.
    pub fn gc(&self) -> usize {
        let mut removed = 0;
        self.store.retain(|_, value| {
            if value.is_expired() {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }

    fn key(query: &str) -> String {
        query.trim().to_lowercase()
    }
}

#[async_trait]
impl<S: SuggestionSource> SuggestionSource for CachedSource<S> {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        let key = Self::key(query);
        if let Some(entry) = self.store.get(&key) {
            if !entry.is_expired() {
                return Ok(entry.values.clone());
            }
            drop(entry);
            self.store.remove(&key);
        }

        let values = self.inner.suggest(query).await?;
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::zero());
        let expires_at = Utc::now() + ttl;
        self.store.insert(
            key,
            CachedCandidates {
                values: values.clone(),
                expires_at,
            },
        );
        Ok(values)
    }
}
