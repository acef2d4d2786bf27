//! SPARQL 1.1 protocol client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use thesaur_core::config::StoreConfig;
use thesaur_core::{defaults, logging, Error, Result, SparqlQuery, Statement, TripleStore, TupleRow};
use tracing::{debug, info, instrument, warn};

use crate::results::{parse_rdf_json, parse_tuple_results};

const SPARQL_QUERY: &str = "application/sparql-query";
const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const RDF_JSON: &str = "application/rdf+json";

/// Queries slower than this are logged at warn.
const SLOW_QUERY_MS: u64 = 5000;

/// Triple store reached over HTTP with the SPARQL protocol.
#[derive(Debug, Clone)]
pub struct SparqlHttpStore {
    client: Client,
    endpoint: String,
    default_timeout: Duration,
}

impl SparqlHttpStore {
    /// Create a store for an endpoint URL.
    pub fn new(endpoint: impl Into<String>, default_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(defaults::USER_AGENT)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;
        let endpoint = endpoint.into();

        info!(
            { logging::SUBSYSTEM } = "store",
            { logging::COMPONENT } = "sparql_http",
            { logging::ENDPOINT } = %endpoint,
            timeout_secs = default_timeout.as_secs(),
            "Initializing SPARQL store"
        );

        Ok(Self {
            client,
            endpoint,
            default_timeout,
        })
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        Self::new(config.endpoint.clone(), config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the rendered query and return the response body.
    async fn execute(&self, query: &SparqlQuery, accept: &str) -> Result<String> {
        let start = Instant::now();
        let text = query.render()?;

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(query.timeout().unwrap_or(self.default_timeout))
            .header(CONTENT_TYPE, SPARQL_QUERY)
            .header(ACCEPT, accept)
            .body(text)
            .send()
            .await
            .map_err(|e| Error::query(query.name(), format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                { logging::QUERY_NAME } = query.name(),
                { logging::HTTP_STATUS } = status.as_u16(),
                "SPARQL endpoint returned an error"
            );
            return Err(Error::query(
                query.name(),
                format!("SPARQL endpoint returned {}: {}", status, body),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::query(query.name(), format!("Failed to read response: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            { logging::QUERY_NAME } = query.name(),
            { logging::HTTP_STATUS } = status.as_u16(),
            response_len = body.len(),
            { logging::DURATION_MS } = elapsed,
            "SPARQL query complete"
        );
        if elapsed > SLOW_QUERY_MS {
            warn!(
                { logging::QUERY_NAME } = query.name(),
                { logging::DURATION_MS } = elapsed,
                slow = true,
                "Slow SPARQL query"
            );
        }
        Ok(body)
    }
}

#[async_trait]
impl TripleStore for SparqlHttpStore {
    #[instrument(skip(self, query), fields(subsystem = "store", component = "sparql_http", op = "graph_query", query_name = query.name()))]
    async fn run_graph_query(&self, query: &SparqlQuery) -> Result<Vec<Statement>> {
        let body = self.execute(query, RDF_JSON).await?;
        parse_rdf_json(&body).map_err(|e| e.with_context(query.name()))
    }

    #[instrument(skip(self, query), fields(subsystem = "store", component = "sparql_http", op = "tuple_query", query_name = query.name()))]
    async fn run_tuple_query(&self, query: &SparqlQuery) -> Result<Vec<TupleRow>> {
        let body = self.execute(query, SPARQL_RESULTS_JSON).await?;
        parse_tuple_results(&body).map_err(|e| e.with_context(query.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store() {
        let store = SparqlHttpStore::new("http://localhost:7200/repositories/t", Duration::from_secs(3)).unwrap();
        assert_eq!(store.endpoint(), "http://localhost:7200/repositories/t");
        assert_eq!(store.default_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_config_validates() {
        let config = StoreConfig {
            endpoint: "not-a-url".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(SparqlHttpStore::from_config(&config), Err(Error::Config(_))));
        assert!(SparqlHttpStore::from_config(&StoreConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_query_error() {
        let store = SparqlHttpStore::new("http://127.0.0.1:1/repositories/none", Duration::from_secs(2)).unwrap();
        let err = store
            .run_tuple_query(&crate::sparql::search_count("appel"))
            .await
            .unwrap_err();
        match err {
            Error::QueryExecution { context, .. } => assert_eq!(context, "search_count"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_render_failure_is_reported_before_request() {
        let store = SparqlHttpStore::new("http://127.0.0.1:1/repositories/none", Duration::from_secs(2)).unwrap();
        let query = SparqlQuery::new("broken", "SELECT * WHERE { ${missing} ?p ?o }");
        let err = store.run_tuple_query(&query).await.unwrap_err();
        assert!(err.to_string().contains("no binding"));
    }
}
