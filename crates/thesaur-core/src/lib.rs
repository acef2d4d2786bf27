//! # thesaur-core
//!
//! Core types, traits, and abstractions for thesaur.
//!
//! This crate provides the SKOS data model (localized values, resources and
//! typed entities), the search request/response types, and the triple store
//! trait that the other thesaur crates depend on.

pub mod config;
pub mod defaults;
pub mod entities;
pub mod error;
pub mod localized;
pub mod logging;
pub mod rdf;
pub mod resource;
pub mod search;
pub mod traits;
pub mod vocab;

// Re-export commonly used types at crate root
pub use config::ThesaurConfig;
pub use entities::{Collection, Concept, ConceptGroup, ConceptScheme, Entity, Entry, Materializable};
pub use error::{Error, Result};
pub use localized::{LocalizedValue, LocalizedValueSet};
pub use rdf::{Statement, Term, TupleRow};
pub use resource::{is_blank_key, Resource, BLANK_NODE_PREFIX};
pub use search::*;
pub use traits::*;
