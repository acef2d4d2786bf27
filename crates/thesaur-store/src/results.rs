//! Result document models for the SPARQL protocol.
//!
//! Tuple queries answer in `application/sparql-results+json`, graph queries
//! in RDF/JSON (`application/rdf+json`). Both are parsed with serde into the
//! core term model.

use std::collections::BTreeMap;

use serde::Deserialize;
use thesaur_core::{Error, Result, Statement, Term, TupleRow};

/// A term as serialized by both result formats.
///
/// SPARQL JSON results use `xml:lang` for the language tag, RDF/JSON `lang`.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonTerm {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
    #[serde(default, alias = "xml:lang")]
    pub lang: Option<String>,
    #[serde(default)]
    pub datatype: Option<String>,
}

impl JsonTerm {
    pub fn into_term(self) -> Result<Term> {
        match self.kind.as_str() {
            "uri" => Ok(Term::Iri(self.value)),
            "bnode" => Ok(Term::BlankNode(strip_blank_prefix(&self.value).to_string())),
            "literal" | "typed-literal" => Ok(match (self.lang, self.datatype) {
                (Some(lang), _) => Term::lang_literal(self.value, &lang),
                (None, Some(datatype)) => Term::typed_literal(self.value, datatype),
                (None, None) => Term::literal(self.value),
            }),
            other => Err(Error::Serialization(format!("unknown term type: {}", other))),
        }
    }
}

fn strip_blank_prefix(value: &str) -> &str {
    value.strip_prefix("_:").unwrap_or(value)
}

/// `application/sparql-results+json` document.
#[derive(Debug, Deserialize)]
pub struct SparqlResults {
    #[serde(default)]
    pub head: SparqlHead,
    pub results: SparqlBindings,
}

#[derive(Debug, Default, Deserialize)]
pub struct SparqlHead {
    #[serde(default)]
    pub vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SparqlBindings {
    pub bindings: Vec<BTreeMap<String, JsonTerm>>,
}

impl SparqlResults {
    pub fn into_rows(self) -> Result<Vec<TupleRow>> {
        self.results
            .bindings
            .into_iter()
            .map(|solution| {
                let mut row = TupleRow::new();
                for (variable, term) in solution {
                    row.bind(variable, term.into_term()?);
                }
                Ok(row)
            })
            .collect()
    }
}

/// `application/rdf+json` document: subject → predicate → objects.
pub type RdfJson = BTreeMap<String, BTreeMap<String, Vec<JsonTerm>>>;

/// Parse a SPARQL JSON results document into rows.
pub fn parse_tuple_results(body: &str) -> Result<Vec<TupleRow>> {
    let results: SparqlResults = serde_json::from_str(body)?;
    results.into_rows()
}

/// Parse an RDF/JSON document into statements.
pub fn parse_rdf_json(body: &str) -> Result<Vec<Statement>> {
    let graph: RdfJson = serde_json::from_str(body)?;
    let mut statements = Vec::new();
    for (subject, predicates) in graph {
        let subject = match subject.strip_prefix("_:") {
            Some(id) => Term::BlankNode(id.to_string()),
            None => Term::Iri(subject),
        };
        for (predicate, objects) in predicates {
            for object in objects {
                statements.push(Statement::new(subject.clone(), predicate.clone(), object.into_term()?));
            }
        }
    }
    Ok(statements)
}
