//! Concept search over a triple store.
//!
//! A search runs two queries on the store: a count of every match, then one
//! sorted page of results. Each result carries a highlighted excerpt of the
//! label that matched.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use regex::Regex;
use thesaur_core::{
    defaults, logging, Error, Result, SearchQuery, SearchResult, SearchResultsPage, SparqlQuery,
    ThesaurConfig, TripleStore, TupleRow,
};
use thesaur_store::sparql::{self, vars};
use tracing::{debug, info, instrument, trace, warn};

use crate::highlight::HighlightFormatter;
use crate::pattern::{build_pattern, compile_pattern};
use crate::sort::order_keys;

/// Searches above this duration are logged as slow.
const SLOW_SEARCH_MS: u64 = 2000;

/// Concept search interface.
#[async_trait]
pub trait ConceptSearch: Send + Sync {
    /// Run a search and return the requested page.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResultsPage>;
}

/// Search engine issuing count and result queries to a [`TripleStore`].
#[derive(Debug, Clone)]
pub struct ConceptSearchEngine<S> {
    store: S,
    formatter: HighlightFormatter,
    languages: Vec<String>,
    timeout: Option<Duration>,
}

impl<S: TripleStore> ConceptSearchEngine<S> {
    /// Create an engine resolving labels in the default languages.
    pub fn new(store: S, formatter: HighlightFormatter) -> Self {
        Self {
            store,
            formatter,
            languages: defaults::LANGUAGES.iter().map(|l| l.to_string()).collect(),
            timeout: None,
        }
    }

    /// Create an engine from the search and store sections of a config.
    pub fn from_config(store: S, config: &ThesaurConfig) -> Result<Self> {
        let formatter = HighlightFormatter::from_config(&config.search)?;
        Ok(Self::new(store, formatter)
            .with_timeout(config.store.timeout())
            .with_languages(&config.search.languages))
    }

    /// Language priority for the concept labels and scheme titles returned.
    /// Untagged values, then any language, are used when none matches.
    pub fn with_languages<L: AsRef<str>>(mut self, languages: &[L]) -> Self {
        self.languages = languages
            .iter()
            .map(|l| l.as_ref().to_lowercase())
            .collect();
        self
    }

    /// Resolve labels in a single language.
    pub fn with_language(self, language: &str) -> Self {
        self.with_languages(&[language])
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    fn apply_timeout(&self, query: SparqlQuery) -> SparqlQuery {
        match self.timeout {
            Some(timeout) => query.with_timeout(timeout),
            None => query,
        }
    }

    async fn count(&self, pattern: &str) -> Result<i64> {
        let query = self.apply_timeout(sparql::search_count(pattern));
        let rows = self
            .store
            .run_tuple_query(&query)
            .await
            .map_err(|e| e.with_context("search count"))?;

        let [row] = rows.as_slice() else {
            return Err(Error::query(
                "search count",
                format!("expected exactly one row, got {}", rows.len()),
            ));
        };
        let value = row
            .value(vars::COUNT)
            .ok_or_else(|| Error::query("search count", format!("no ?{} binding", vars::COUNT)))?;
        value.trim().parse::<i64>().map_err(|e| {
            Error::query("search count", format!("?{} is not an integer ({:?}): {}", vars::COUNT, value, e))
        })
    }

    async fn results(&self, query: &SearchQuery, pattern: &str, regex: &Regex) -> Result<Vec<SearchResult>> {
        let mut sparql_query = sparql::search_results(pattern, &self.languages)
            .with_offset(query.offset)
            .with_limit(query.page_size);
        for key in order_keys(&query.sort_criteria) {
            sparql_query = sparql_query.order_by(key);
        }
        let sparql_query = self.apply_timeout(sparql_query);

        let context = format!(
            "search results (offset {}, limit {})",
            query.offset, query.page_size
        );
        let rows = self
            .store
            .run_tuple_query(&sparql_query)
            .await
            .map_err(|e| e.with_context(context.as_str()))?;

        rows.iter()
            .map(|row| self.result_from_row(row, regex).map_err(|e| e.with_context(context.as_str())))
            .collect()
    }

    fn result_from_row(&self, row: &TupleRow, regex: &Regex) -> Result<SearchResult> {
        let required = |variable: &str| {
            row.value(variable)
                .map(str::to_string)
                .ok_or_else(|| Error::query("search result row", format!("no ?{} binding", variable)))
        };
        let optional = |variable: &str| row.value(variable).map(str::to_string);

        let concept_uri = required(vars::CONCEPT)?;
        let scheme_uri = required(vars::SCHEME)?;
        let matching_label = required(vars::MATCHING_LABEL)?;
        let highlighted_excerpt = self.formatter.highlight(&matching_label, regex);
        trace!(concept = %concept_uri, label = %matching_label, "Search result row");

        Ok(SearchResult {
            concept_uri,
            scheme_uri,
            concept_label: optional(vars::CONCEPT_LABEL),
            scheme_title: optional(vars::SCHEME_TITLE),
            matching_label,
            highlighted_excerpt,
        })
    }
}

#[async_trait]
impl<S: TripleStore> ConceptSearch for ConceptSearchEngine<S> {
    #[instrument(skip(self, query), fields(
        subsystem = "search",
        component = "concept_search",
        op = "search",
        query = %query.text,
        offset = query.offset,
        page_size = query.page_size,
    ))]
    async fn search(&self, query: &SearchQuery) -> Result<SearchResultsPage> {
        let start = Instant::now();
        query.validate()?;

        let pattern = build_pattern(&query.text);
        let regex = compile_pattern(&pattern)?;
        debug!({ logging::PATTERN } = %pattern, "Built search pattern");

        let count_start = Instant::now();
        let total_matches = self.count(&pattern).await?;
        debug!(
            { logging::TOTAL_MATCHES } = total_matches,
            { logging::DURATION_MS } = count_start.elapsed().as_millis() as u64,
            "Count phase complete"
        );

        let results = if total_matches == 0 || query.offset >= total_matches {
            debug!("No results in requested page, skipping result phase");
            Vec::new()
        } else {
            let results_start = Instant::now();
            let results = self.results(query, &pattern, &regex).await?;
            debug!(
                { logging::RESULT_COUNT } = results.len(),
                { logging::DURATION_MS } = results_start.elapsed().as_millis() as u64,
                "Result phase complete"
            );
            results
        };

        let page = SearchResultsPage::new(query.clone(), total_matches, results);
        let duration_ms = start.elapsed().as_millis() as u64;
        if duration_ms > SLOW_SEARCH_MS {
            warn!({ logging::DURATION_MS } = duration_ms, slow = true, "Slow concept search");
        }
        info!(
            { logging::TOTAL_MATCHES } = total_matches,
            { logging::PAGE } = page.page_number,
            { logging::RESULT_COUNT } = page.results.len(),
            { logging::DURATION_MS } = duration_ms,
            "Concept search completed"
        );
        Ok(page)
    }
}
