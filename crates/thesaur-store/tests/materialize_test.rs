//! Materialization of store answers into SKOS entities.
//!
//! Covers the path from an RDF/JSON document to typed entities, and the
//! repository loaders over the mock store.

use thesaur_core::vocab::{dcterms, skos};
use thesaur_core::{Concept, ConceptScheme, Entity, Error, Materializable, Resource, Statement, Term};
use thesaur_store::results::parse_rdf_json;
use thesaur_store::{
    materialize, materialize_single, sparql, MaterializeMode, MockTripleStore, SkosRepository,
};

const THESAURUS: &str = r#"{
    "http://ex.org/s1": {
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#type": [{"type": "uri", "value": "http://www.w3.org/2004/02/skos/core#ConceptScheme"}],
        "http://purl.org/dc/terms/title": [
            {"type": "literal", "value": "Marchés publics", "lang": "fr"},
            {"type": "literal", "value": "Public procurement", "lang": "en"}
        ]
    },
    "http://ex.org/c1": {
        "http://www.w3.org/2004/02/skos/core#prefLabel": [
            {"type": "literal", "value": "Appel d'offres", "lang": "fr"},
            {"type": "literal", "value": "Call for tenders", "lang": "en"}
        ],
        "http://www.w3.org/2004/02/skos/core#altLabel": [{"type": "literal", "value": "AO", "lang": "fr"}],
        "http://www.w3.org/2004/02/skos/core#inScheme": [{"type": "uri", "value": "http://ex.org/s1"}],
        "http://www.w3.org/2004/02/skos/core#scopeNote": [{"type": "bnode", "value": "_:note1"}]
    },
    "_:note1": {
        "http://www.w3.org/1999/02/22-rdf-syntax-ns#value": [{"type": "literal", "value": "Procédure formalisée"}]
    }
}"#;

#[test]
fn test_rdf_json_to_entities() {
    let statements = parse_rdf_json(THESAURUS).unwrap();
    let result = materialize::<Resource, _>(statements, MaterializeMode::Accumulate);

    assert_eq!(result.len(), 3);
    assert_eq!(result.named().count(), 2);

    let c1 = Concept::from_resource(result.get("http://ex.org/c1").unwrap().clone());
    assert_eq!(c1.label(&["en"]), "Call for tenders");
    assert_eq!(c1.scheme_uris(), vec!["http://ex.org/s1"]);
    assert_eq!(c1.alt_labels().unwrap().len(), 1);
    assert!(c1.resource().has_association(skos::SCOPE_NOTE, &result.blank_key("note1")));

    let s1 = ConceptScheme::from_resource(result.get("http://ex.org/s1").unwrap().clone());
    assert_eq!(s1.label(&["fr"]), "Marchés publics");
    assert_eq!(s1.titles().unwrap().len(), 2);
}

#[test]
fn test_rdf_json_order_does_not_matter() {
    let statements = parse_rdf_json(THESAURUS).unwrap();
    let mut shuffled = statements.clone();
    shuffled.reverse();
    shuffled.swap(0, 3);

    let a = materialize::<Resource, _>(statements, MaterializeMode::Accumulate).into_map();
    let b = materialize::<Resource, _>(shuffled, MaterializeMode::Accumulate).into_map();
    assert_eq!(a.len(), b.len());
    for (key, resource) in &a {
        assert!(resource.same_content(&b[key]), "content differs for {}", key);
    }
}

#[test]
fn test_single_subject_over_whole_document_is_ambiguous() {
    let statements = parse_rdf_json(THESAURUS).unwrap();
    let err = materialize_single::<Concept, _>(statements).unwrap_err();
    assert!(matches!(err, Error::AmbiguousResult { found: 2, .. }));
}

#[tokio::test]
async fn test_repository_over_mock_store() {
    let description: Vec<Statement> = parse_rdf_json(THESAURUS)
        .unwrap()
        .into_iter()
        .filter(|s| s.subject == Term::iri("http://ex.org/c1"))
        .collect();

    let store = MockTripleStore::new()
        .with_graph_response_for(sparql::names::DESCRIBE, "http://ex.org/c1", description)
        .with_graph_response(
            sparql::names::CONCEPT_SCHEMES,
            vec![Statement::new(
                Term::iri("http://ex.org/s1"),
                dcterms::TITLE,
                Term::lang_literal("Marchés publics", "fr"),
            )],
        );
    let repo = SkosRepository::new(store.clone());

    let concept = repo.concept("http://ex.org/c1").await.unwrap();
    assert_eq!(concept.label(&["fr"]), "Appel d'offres");
    assert_eq!(concept.schemes.len(), 1);
    assert_eq!(concept.schemes[0].label(&["fr"]), "Marchés publics");
    assert!(concept.broader.is_empty());
    assert_eq!(concept.resource().associations(skos::SCOPE_NOTE).count(), 0);

    let calls = store.get_calls();
    assert!(calls.iter().all(|c| c.operation == "graph"));
    assert!(calls[0].rendered.contains("<http://ex.org/c1>"));
}

#[tokio::test]
async fn test_unknown_concept_is_not_found() {
    let repo = SkosRepository::new(MockTripleStore::new());
    let err = repo.concept("http://ex.org/missing").await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(repo.store().call_count(), 1);
}
