//! # thesaur-store
//!
//! Triple store access for thesaur.
//!
//! This crate provides:
//! - Graph materialization of CONSTRUCT results into typed SKOS entities
//! - SPARQL query templates for concepts, schemes, groups, collections and search
//! - A SPARQL 1.1 protocol client over HTTP
//! - A SKOS repository loading entities with their related entities
//! - An in-memory mock store for tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use thesaur_store::{Entity, SkosRepository, SparqlHttpStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SparqlHttpStore::new(
//!         "http://localhost:8080/rdf4j-server/repositories/thesaurus",
//!         Duration::from_secs(30),
//!     )?;
//!     let repo = SkosRepository::new(store);
//!
//!     for scheme in repo.schemes().await? {
//!         println!("{} {}", scheme.uri(), scheme.label(&["fr", "en"]));
//!     }
//!     Ok(())
//! }
//! ```

pub mod http;
pub mod materialize;
pub mod mock;
pub mod results;
pub mod skos;
pub mod sparql;

// Re-export core types
pub use thesaur_core::*;

pub use http::SparqlHttpStore;
pub use materialize::{
    materialize, materialize_single, materialize_with, refresh_into, BlankScope, Materialization,
    MaterializeMode,
};
pub use mock::MockTripleStore;
pub use skos::SkosRepository;
