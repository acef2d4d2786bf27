//! SKOS entity loading over a [`TripleStore`].
//!
//! Each loader runs a CONSTRUCT query for the entity itself, materializes
//! it, then fills related entities with one secondary query per relation.
//! Queries of one call run sequentially.

use std::time::{Duration, Instant};

use thesaur_core::vocab::skos;
use thesaur_core::{
    logging, Collection, Concept, ConceptGroup, ConceptScheme, Error, Materializable, Result,
    SparqlQuery, Statement, TripleStore,
};
use tracing::{debug, instrument};

use crate::materialize::{materialize, materialize_single, refresh_into, MaterializeMode};
use crate::sparql;

/// Loads typed SKOS entities from a triple store.
#[derive(Debug, Clone)]
pub struct SkosRepository<S> {
    store: S,
    timeout: Option<Duration>,
}

impl<S: TripleStore> SkosRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            timeout: None,
        }
    }

    /// Timeout applied to every query this repository issues.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn graph(&self, query: SparqlQuery, context: &str) -> Result<Vec<Statement>> {
        let query = match self.timeout {
            Some(timeout) => query.with_timeout(timeout),
            None => query,
        };
        self.store
            .run_graph_query(&query)
            .await
            .map_err(|e| e.with_context(context))
    }

    /// Entities reached from `uri` through `predicate`, with their labels.
    async fn linked<T: Materializable>(&self, uri: &str, predicate: &str) -> Result<Vec<T>> {
        let statements = self
            .graph(
                sparql::linked_labels(uri, predicate),
                &format!("load {} of <{}>", predicate, uri),
            )
            .await?;
        Ok(materialize::<T, _>(statements, MaterializeMode::Accumulate).into_named())
    }

    /// Load a concept with its broader, narrower and related concepts, its
    /// schemes and the groups it belongs to.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "load_concept"))]
    pub async fn concept(&self, uri: &str) -> Result<Concept> {
        let start = Instant::now();
        let statements = self
            .graph(sparql::describe(uri), &format!("load concept <{}>", uri))
            .await?;
        let mut concept = materialize_single::<Concept, _>(statements)?
            .ok_or_else(|| Error::NotFound(format!("concept <{}>", uri)))?;

        let [broader, narrower, related] = sparql::CONCEPT_LINKS;
        concept.broader = self.linked(uri, broader).await?;
        concept.narrower = self.linked(uri, narrower).await?;
        concept.related = self.linked(uri, related).await?;

        let statements = self
            .graph(
                sparql::concept_schemes(uri),
                &format!("load schemes of <{}>", uri),
            )
            .await?;
        concept.schemes =
            materialize::<ConceptScheme, _>(statements, MaterializeMode::Accumulate).into_named();

        let statements = self
            .graph(sparql::concept_groups(uri), &format!("load groups of <{}>", uri))
            .await?;
        concept.groups =
            materialize::<ConceptGroup, _>(statements, MaterializeMode::Accumulate).into_named();

        debug!(
            { logging::URI } = uri,
            broader = concept.broader.len(),
            narrower = concept.narrower.len(),
            related = concept.related.len(),
            schemes = concept.schemes.len(),
            { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
            "Concept loaded"
        );
        Ok(concept)
    }

    /// Load a concept scheme with its top concepts.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "load_scheme"))]
    pub async fn scheme(&self, uri: &str) -> Result<ConceptScheme> {
        let statements = self
            .graph(sparql::scheme(uri), &format!("load scheme <{}>", uri))
            .await?;
        let mut scheme = materialize_single::<ConceptScheme, _>(statements)?
            .ok_or_else(|| Error::NotFound(format!("concept scheme <{}>", uri)))?;
        scheme.top_concepts = self.top_concepts(uri).await?;
        Ok(scheme)
    }

    /// Every concept scheme, titles and descriptions only.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "list_schemes"))]
    pub async fn schemes(&self) -> Result<Vec<ConceptScheme>> {
        let statements = self.graph(sparql::schemes(), "list schemes").await?;
        let schemes =
            materialize::<ConceptScheme, _>(statements, MaterializeMode::Accumulate).into_named();
        debug!({ logging::RESULT_COUNT } = schemes.len(), "Schemes listed");
        Ok(schemes)
    }

    /// Top concepts of a scheme with their labels.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "top_concepts"))]
    pub async fn top_concepts(&self, scheme_uri: &str) -> Result<Vec<Concept>> {
        let statements = self
            .graph(
                sparql::top_concepts(scheme_uri),
                &format!("load top concepts of <{}>", scheme_uri),
            )
            .await?;
        Ok(materialize::<Concept, _>(statements, MaterializeMode::Accumulate).into_named())
    }

    /// Load a concept group with its members' labels.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "load_group"))]
    pub async fn group(&self, uri: &str) -> Result<ConceptGroup> {
        let statements = self
            .graph(sparql::describe(uri), &format!("load group <{}>", uri))
            .await?;
        let mut group = materialize_single::<ConceptGroup, _>(statements)?
            .ok_or_else(|| Error::NotFound(format!("concept group <{}>", uri)))?;
        group.members = self.linked(uri, skos::MEMBER).await?;
        Ok(group)
    }

    /// Concept groups of a scheme. Members are available as URIs.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "list_groups"))]
    pub async fn groups(&self, scheme_uri: &str) -> Result<Vec<ConceptGroup>> {
        let statements = self
            .graph(
                sparql::groups(scheme_uri),
                &format!("list groups of <{}>", scheme_uri),
            )
            .await?;
        Ok(materialize::<ConceptGroup, _>(statements, MaterializeMode::Accumulate).into_named())
    }

    /// Load a collection with its members' labels.
    #[instrument(skip(self), fields(subsystem = "store", component = "skos_repository", op = "load_collection"))]
    pub async fn collection(&self, uri: &str) -> Result<Collection> {
        let statements = self
            .graph(sparql::describe(uri), &format!("load collection <{}>", uri))
            .await?;
        let mut collection = materialize_single::<Collection, _>(statements)?
            .ok_or_else(|| Error::NotFound(format!("collection <{}>", uri)))?;
        collection.members = self.linked(uri, skos::MEMBER).await?;
        Ok(collection)
    }

    /// Re-query one predicate of an entity and replace its values.
    ///
    /// A predicate with no remaining values in the store is cleared. Returns
    /// the number of statements applied.
    #[instrument(skip(self, entity), fields(subsystem = "store", component = "skos_repository", op = "refresh_property", uri = %entity.resource().uri()))]
    pub async fn refresh_property<T>(&self, entity: &mut T, predicate: &str) -> Result<usize>
    where
        T: Materializable + Send,
    {
        let uri = entity.resource().uri().to_string();
        let statements = self
            .graph(
                sparql::property(&uri, predicate),
                &format!("refresh {} of <{}>", predicate, uri),
            )
            .await?;

        if statements.is_empty() {
            let resource = entity.resource_mut();
            resource.reset_property(predicate);
            resource.reset_association(predicate);
            return Ok(0);
        }
        Ok(refresh_into(entity, statements))
    }
}
