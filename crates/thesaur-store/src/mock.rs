//! In-memory triple store for deterministic testing.
//!
//! Responses are canned per query name, optionally narrowed to the IRI bound
//! to the `uri` (or `scheme`) placeholder. Every call is logged with its
//! rendered text.
//!
//! ## Usage
//!
//! ```rust
//! use thesaur_core::{Statement, Term, TripleStore};
//! use thesaur_store::mock::MockTripleStore;
//! use thesaur_store::sparql;
//!
//! # tokio_test_block(async {
//! let store = MockTripleStore::new().with_graph_response(
//!     sparql::names::DESCRIBE,
//!     vec![Statement::new(Term::iri("http://ex.org/c1"), "http://ex.org/p", Term::literal("v"))],
//! );
//!
//! let statements = store.run_graph_query(&sparql::describe("http://ex.org/c1")).await.unwrap();
//! assert_eq!(statements.len(), 1);
//! assert_eq!(store.call_count(), 1);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thesaur_core::{BindingValue, Error, Result, SparqlQuery, Statement, TripleStore, TupleRow};

use crate::sparql::params;

/// Mock triple store for testing.
#[derive(Clone, Default)]
pub struct MockTripleStore {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

/// Response lookup key: query name plus the bound subject IRI, if narrowed.
type ResponseKey = (String, Option<String>);

#[derive(Debug, Clone, Default)]
struct MockConfig {
    graph_responses: HashMap<ResponseKey, Vec<Statement>>,
    tuple_responses: HashMap<ResponseKey, Vec<TupleRow>>,
    failures: HashMap<String, String>,
    latency: Duration,
}

/// One recorded store call.
#[derive(Debug, Clone)]
pub struct MockCall {
    /// `"graph"` or `"tuple"`.
    pub operation: String,
    pub query_name: String,
    pub rendered: String,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub timestamp: Instant,
}

impl MockTripleStore {
    /// Create a mock store answering every query with an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Statements returned for a graph query name.
    pub fn with_graph_response(mut self, query_name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Arc::make_mut(&mut self.config)
            .graph_responses
            .insert((query_name.into(), None), statements);
        self
    }

    /// Statements returned for a graph query name bound to a specific IRI.
    pub fn with_graph_response_for(
        mut self,
        query_name: impl Into<String>,
        iri: impl Into<String>,
        statements: Vec<Statement>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .graph_responses
            .insert((query_name.into(), Some(iri.into())), statements);
        self
    }

    /// Rows returned for a tuple query name.
    pub fn with_tuple_response(mut self, query_name: impl Into<String>, rows: Vec<TupleRow>) -> Self {
        Arc::make_mut(&mut self.config)
            .tuple_responses
            .insert((query_name.into(), None), rows);
        self
    }

    /// Make every query with this name fail with `message`.
    pub fn with_failure(mut self, query_name: impl Into<String>, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config)
            .failures
            .insert(query_name.into(), message.into());
        self
    }

    /// Set simulated latency for all operations.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.log().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.log().clear()
    }

    pub fn call_count(&self) -> usize {
        self.log().len()
    }

    /// Names of the queries run, in call order.
    pub fn query_names(&self) -> Vec<String> {
        self.log().iter().map(|c| c.query_name.clone()).collect()
    }

    fn log(&self) -> MutexGuard<'_, Vec<MockCall>> {
        self.call_log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn record(&self, operation: &str, query: &SparqlQuery) -> Result<()> {
        let rendered = query.render()?;
        self.log().push(MockCall {
            operation: operation.to_string(),
            query_name: query.name().to_string(),
            rendered,
            offset: query.offset(),
            limit: query.limit(),
            timestamp: Instant::now(),
        });

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        match self.config.failures.get(query.name()) {
            Some(message) => Err(Error::query(query.name(), message.clone())),
            None => Ok(()),
        }
    }
}

/// The IRI a query is about: its `uri` binding, else its `scheme` binding.
fn subject_binding(query: &SparqlQuery) -> Option<String> {
    [params::URI, params::SCHEME]
        .iter()
        .find_map(|name| match query.binding(name) {
            Some(BindingValue::Iri(iri)) => Some(iri.clone()),
            _ => None,
        })
}

fn lookup<'a, V>(responses: &'a HashMap<ResponseKey, V>, query: &SparqlQuery) -> Option<&'a V> {
    let name = query.name().to_string();
    subject_binding(query)
        .and_then(|iri| responses.get(&(name.clone(), Some(iri))))
        .or_else(|| responses.get(&(name, None)))
}

#[async_trait]
impl TripleStore for MockTripleStore {
    async fn run_graph_query(&self, query: &SparqlQuery) -> Result<Vec<Statement>> {
        self.record("graph", query).await?;
        Ok(lookup(&self.config.graph_responses, query)
            .cloned()
            .unwrap_or_default())
    }

    async fn run_tuple_query(&self, query: &SparqlQuery) -> Result<Vec<TupleRow>> {
        self.record("tuple", query).await?;
        let rows = lookup(&self.config.tuple_responses, query)
            .cloned()
            .unwrap_or_default();

        let offset = query.offset().unwrap_or(0).max(0) as usize;
        let limit = query.limit().map(|l| l.max(0) as usize).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sparql;
    use thesaur_core::Term;

    fn statement(subject: &str) -> Statement {
        Statement::new(Term::iri(subject), "http://ex.org/p", Term::literal("v"))
    }

    #[tokio::test]
    async fn test_empty_by_default() {
        let store = MockTripleStore::new();
        assert!(store.run_graph_query(&sparql::schemes()).await.unwrap().is_empty());
        assert!(store.run_tuple_query(&sparql::search_count("x")).await.unwrap().is_empty());
        assert_eq!(store.call_count(), 2);
    }

    #[tokio::test]
    async fn test_response_narrowed_by_iri() {
        let store = MockTripleStore::new()
            .with_graph_response(sparql::names::DESCRIBE, vec![statement("http://ex.org/any")])
            .with_graph_response_for(sparql::names::DESCRIBE, "http://ex.org/c1", vec![statement("http://ex.org/c1")]);

        let c1 = store.run_graph_query(&sparql::describe("http://ex.org/c1")).await.unwrap();
        assert_eq!(c1[0].subject, Term::iri("http://ex.org/c1"));

        let other = store.run_graph_query(&sparql::describe("http://ex.org/c9")).await.unwrap();
        assert_eq!(other[0].subject, Term::iri("http://ex.org/any"));
    }

    #[tokio::test]
    async fn test_tuple_pagination() {
        let rows: Vec<TupleRow> = (0..5)
            .map(|i| TupleRow::new().with("n", Term::literal(i.to_string())))
            .collect();
        let store = MockTripleStore::new().with_tuple_response(sparql::names::SEARCH_RESULTS, rows);

        let page = store
            .run_tuple_query(&sparql::search_results("x", &["fr"]).with_offset(2).with_limit(2))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].value("n"), Some("2"));
    }

    #[tokio::test]
    async fn test_failure_is_query_error_and_logged() {
        let store = MockTripleStore::new().with_failure(sparql::names::SEARCH_COUNT, "boom");
        let err = store.run_tuple_query(&sparql::search_count("x")).await.unwrap_err();
        assert!(matches!(err, Error::QueryExecution { .. }));
        assert_eq!(store.query_names(), vec![sparql::names::SEARCH_COUNT]);
    }

    #[tokio::test]
    async fn test_call_log_records_rendered_text() {
        let store = MockTripleStore::new();
        store.run_tuple_query(&sparql::search_count("appel")).await.unwrap();
        let calls = store.get_calls();
        assert_eq!(calls[0].operation, "tuple");
        assert!(calls[0].rendered.contains("\"appel\""));
        store.clear_calls();
        assert_eq!(store.call_count(), 0);
    }
}
