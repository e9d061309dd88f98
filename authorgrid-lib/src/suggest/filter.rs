//! In-memory suggestion source with fuzzy matching.

use async_trait::async_trait;
use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use super::SuggestionSource;
use crate::error::SuggestError;

/// One institution that matched a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterMatch {
    /// Index into the institution list.
    pub index: usize,
    /// Fuzzy score, higher is better.
    pub score: u32,
    /// Rows already using the institution.
    pub uses: usize,
}

/// Ranks `names` against `query`.
///
/// Best score first; equal scores go to the institution more rows already
/// use, then to list order. `uses` is indexed like `names` and may be
/// shorter. A blank query matches nothing.
pub fn fuzzy_filter(query: &str, names: &[String], uses: &[usize]) -> Vec<FilterMatch> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let pattern = Pattern::new(
        query,
        CaseMatching::Ignore,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);
    let mut buf = Vec::new();

    let mut ranked = Vec::new();
    for (index, name) in names.iter().enumerate() {
        let Some(score) = pattern.score(Utf32Str::new(name, &mut buf), &mut matcher) else {
            continue;
        };
        ranked.push(FilterMatch {
            index,
            score,
            uses: uses.get(index).copied().unwrap_or(0),
        });
    }

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(b.uses.cmp(&a.uses)));
    ranked
}

/// A fixed list of institutions, filtered fuzzily per query.
///
/// # Example
///
/// ```
/// use authorgrid_lib::suggest::{StaticSuggestions, SuggestionSource};
///
/// # tokio_test_block(async {
/// let source = StaticSuggestions::new(["CERN", "DESY", "Fermilab"]);
/// let hits = source.suggest("ferm").await.unwrap();
/// assert_eq!(hits, vec!["Fermilab".to_string()]);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticSuggestions {
    names: Vec<String>,
    uses: Vec<usize>,
    limit: usize,
}

impl StaticSuggestions {
    /// Creates a source over the given names, returning at most 10 hits.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        Self {
            uses: vec![0; names.len()],
            names,
            limit: 10,
        }
    }

    /// Sets the maximum number of candidates returned.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Records how many rows use each institution, for ranking ties.
    ///
    /// Names not in the list are ignored.
    pub fn with_usage<S>(mut self, usage: impl IntoIterator<Item = (S, usize)>) -> Self
    where
        S: AsRef<str>,
    {
        for (name, count) in usage {
            if let Some(i) = self.names.iter().position(|n| n == name.as_ref()) {
                self.uses[i] = count;
            }
        }
        self
    }

    /// Returns the number of known names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if there are no names.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[async_trait]
impl SuggestionSource for StaticSuggestions {
    async fn suggest(&self, query: &str) -> Result<Vec<String>, SuggestError> {
        Ok(fuzzy_filter(query, &self.names, &self.uses)
            .into_iter()
            .take(self.limit)
            .map(|m| self.names[m.index].clone())
            .collect())
    }
}
