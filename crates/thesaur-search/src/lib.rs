//! # thesaur-search
//!
//! Concept search for thesaur.
//!
//! This crate provides:
//! - Free-text search patterns (ordered terms, case-insensitive)
//! - A two-phase search engine (match count, then one sorted page)
//! - Sort criteria mapped onto result variables, with a default order
//! - Highlighted, word-bounded excerpts of the matching labels
//! - Natural, locale-aware ordering of labels
//!
//! ## Example
//!
//! ```rust,no_run
//! use thesaur_search::{ConceptSearch, ConceptSearchEngine, SearchQuery, SortField};
//! use thesaur_store::SparqlHttpStore;
//! use thesaur_core::ThesaurConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ThesaurConfig::load()?;
//!     let store = SparqlHttpStore::from_config(&config.store)?;
//!     let engine = ConceptSearchEngine::from_config(store, &config)?;
//!
//!     let query = SearchQuery::new("appel offres")
//!         .with_page_size(10)
//!         .sort_asc(SortField::ConceptLabel);
//!     let page = engine.search(&query).await?;
//!
//!     for result in &page.results {
//!         println!("{} {}", result.concept_uri, result.highlighted_excerpt);
//!     }
//!     Ok(())
//! }
//! ```

pub mod collation;
pub mod engine;
pub mod highlight;
pub mod pattern;
pub mod sort;

// Re-export core types
pub use thesaur_core::*;

pub use collation::{CollatorCache, LabelSorter, NaturalKey};
pub use engine::{ConceptSearch, ConceptSearchEngine};
pub use highlight::HighlightFormatter;
pub use pattern::{build_pattern, compile_pattern};
pub use sort::{order_keys, DEFAULT_SORT};
