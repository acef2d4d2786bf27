//! End-to-end concept search over an in-memory label index.
//!
//! The index answers the count and result queries the way a SPARQL endpoint
//! would: it filters labels with the bound pattern, orders rows by the
//! query's ORDER BY keys and applies offset and limit.

use std::cmp::Ordering;

use async_trait::async_trait;
use thesaur_core::{
    BindingValue, Error, Result, SearchQuery, SortDirection, SortField, SparqlQuery, Statement,
    Term, TripleStore, TupleRow,
};
use thesaur_search::{compile_pattern, ConceptSearch, ConceptSearchEngine, HighlightFormatter};
use thesaur_store::sparql::{names, params, vars};

struct Entry {
    concept: &'static str,
    scheme: &'static str,
    scheme_title: &'static str,
    label: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        concept: "http://ex.org/c/procedure-appel",
        scheme: "http://ex.org/s/procedures",
        scheme_title: "Procédures",
        label: "Procédure d'appel",
    },
    Entry {
        concept: "http://ex.org/c/appel-public",
        scheme: "http://ex.org/s/marches",
        scheme_title: "Marchés publics",
        label: "Appel public",
    },
    Entry {
        concept: "http://ex.org/c/appel-offres",
        scheme: "http://ex.org/s/marches",
        scheme_title: "Marchés publics",
        label: "Appel d'offres",
    },
    Entry {
        concept: "http://ex.org/c/attribution",
        scheme: "http://ex.org/s/marches",
        scheme_title: "Marchés publics",
        label: "Attribution",
    },
];

struct LabelIndex;

impl LabelIndex {
    fn matching_rows(query: &SparqlQuery) -> Result<Vec<TupleRow>> {
        let pattern = match query.binding(params::PATTERN) {
            Some(BindingValue::Literal(pattern)) => pattern.clone(),
            other => return Err(Error::query(query.name(), format!("bad pattern binding {:?}", other))),
        };
        let regex = compile_pattern(&pattern)?;

        Ok(ENTRIES
            .iter()
            .filter(|e| regex.is_match(e.label))
            .map(|e| {
                TupleRow::new()
                    .with(vars::CONCEPT, Term::iri(e.concept))
                    .with(vars::SCHEME, Term::iri(e.scheme))
                    .with(vars::CONCEPT_LABEL, Term::lang_literal(e.label, "fr"))
                    .with(vars::SCHEME_TITLE, Term::lang_literal(e.scheme_title, "fr"))
                    .with(vars::MATCHING_LABEL, Term::lang_literal(e.label, "fr"))
            })
            .collect())
    }
}

#[async_trait]
impl TripleStore for LabelIndex {
    async fn run_graph_query(&self, _query: &SparqlQuery) -> Result<Vec<Statement>> {
        Ok(Vec::new())
    }

    async fn run_tuple_query(&self, query: &SparqlQuery) -> Result<Vec<TupleRow>> {
        let mut rows = Self::matching_rows(query)?;

        if query.name() == names::SEARCH_COUNT {
            let count = Term::typed_literal(rows.len().to_string(), "http://www.w3.org/2001/XMLSchema#integer");
            return Ok(vec![TupleRow::new().with(vars::COUNT, count)]);
        }

        let keys = query.order_keys().to_vec();
        rows.sort_by(|a, b| {
            keys.iter()
                .map(|key| {
                    let ord = a.value(&key.variable).cmp(&b.value(&key.variable));
                    match key.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                })
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
        });

        let offset = query.offset().unwrap_or(0) as usize;
        let limit = query.limit().map(|l| l as usize).unwrap_or(usize::MAX);
        Ok(rows.into_iter().skip(offset).take(limit).collect())
    }
}

fn engine() -> ConceptSearchEngine<LabelIndex> {
    let formatter = HighlightFormatter::new(80, 30, "<b>", "</b>").unwrap();
    ConceptSearchEngine::new(LabelIndex, formatter).with_language("fr")
}

#[tokio::test]
async fn test_first_page_in_default_order() {
    let page = engine()
        .search(&SearchQuery::new("appel").with_page_size(2))
        .await
        .unwrap();

    assert_eq!(page.total_matches, 3);
    assert_eq!(page.page_number, 1);
    assert_eq!(page.results.len(), 2);
    assert!(page.has_next_page());

    let labels: Vec<&str> = page.results.iter().map(|r| r.matching_label.as_str()).collect();
    assert_eq!(labels, vec!["Appel d'offres", "Appel public"]);
    assert_eq!(page.results[0].scheme_title.as_deref(), Some("Marchés publics"));
    assert_eq!(page.results[0].concept_uri, "http://ex.org/c/appel-offres");

    for result in &page.results {
        assert!(result.highlighted_excerpt.contains("<b>Appel</b>"), "{}", result.highlighted_excerpt);
    }
    assert_eq!(page.results[0].highlighted_excerpt, "<b>Appel</b> d&#39;offres");
}

#[tokio::test]
async fn test_second_page() {
    let page = engine()
        .search(&SearchQuery::new("appel").with_offset(2).with_page_size(2))
        .await
        .unwrap();

    assert_eq!(page.total_matches, 3);
    assert_eq!(page.page_number, 2);
    assert!(!page.has_next_page());
    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].matching_label, "Procédure d'appel");
    assert_eq!(page.results[0].highlighted_excerpt, "Procédure d&#39;<b>appel</b>");
}

#[tokio::test]
async fn test_explicit_sort_overrides_default() {
    let query = SearchQuery::new("appel")
        .sort_desc(SortField::SchemeTitle)
        .sort_asc(SortField::ConceptLabel);
    let page = engine().search(&query).await.unwrap();

    let labels: Vec<&str> = page.results.iter().map(|r| r.matching_label.as_str()).collect();
    assert_eq!(labels, vec!["Procédure d'appel", "Appel d'offres", "Appel public"]);
}

#[tokio::test]
async fn test_terms_must_appear_in_order() {
    let page = engine().search(&SearchQuery::new("appel offres")).await.unwrap();
    assert_eq!(page.total_matches, 1);
    assert_eq!(page.results[0].highlighted_excerpt, "<b>Appel d&#39;offres</b>");

    let page = engine().search(&SearchQuery::new("offres appel")).await.unwrap();
    assert_eq!(page.total_matches, 0);
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let page = engine()
        .search(&SearchQuery::new("appel").with_offset(40).with_page_size(10))
        .await
        .unwrap();
    assert_eq!(page.total_matches, 3);
    assert_eq!(page.page_number, 5);
    assert!(page.is_empty());
}
