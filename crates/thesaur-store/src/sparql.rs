//! SPARQL query templates for the thesaurus.
//!
//! Every query is a named template with `${...}` placeholders; the builder
//! functions bind the placeholders and return a [`SparqlQuery`].

use std::fmt::Write;

use thesaur_core::vocab::skos;
use thesaur_core::{BindingValue, SparqlQuery};

/// Template names, used in logs, error context and by test doubles.
pub mod names {
    pub const DESCRIBE: &str = "describe";
    pub const LINKED_LABELS: &str = "linked_labels";
    pub const CONCEPT_SCHEMES: &str = "concept_schemes";
    pub const CONCEPT_GROUPS: &str = "concept_groups";
    pub const SCHEME: &str = "scheme";
    pub const SCHEMES: &str = "schemes";
    pub const TOP_CONCEPTS: &str = "top_concepts";
    pub const GROUPS: &str = "groups";
    pub const PROPERTY: &str = "property";
    pub const SEARCH_COUNT: &str = "search_count";
    pub const SEARCH_RESULTS: &str = "search_results";
}

/// Placeholder names.
pub mod params {
    pub const URI: &str = "uri";
    pub const PREDICATE: &str = "predicate";
    pub const SCHEME: &str = "scheme";
    pub const PATTERN: &str = "pattern";
    pub const LANG: &str = "lang";
}

/// Variables projected by the search queries.
pub mod vars {
    pub const COUNT: &str = "count";
    pub const CONCEPT: &str = "concept";
    pub const SCHEME: &str = "scheme";
    pub const CONCEPT_LABEL: &str = "conceptLabel";
    pub const SCHEME_TITLE: &str = "schemeTitle";
    pub const MATCHING_LABEL: &str = "matchingLabel";
}

macro_rules! prefixes {
    () => {
        "PREFIX skos: <http://www.w3.org/2004/02/skos/core#>\n\
         PREFIX isothes: <http://purl.org/iso25964/skos-thes#>\n\
         PREFIX dcterms: <http://purl.org/dc/terms/>\n\
         PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>\n\
         PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>\n"
    };
}

/// Concepts in a scheme with a pref/alt/hidden label matching the pattern.
macro_rules! search_match {
    () => {
        "?concept a skos:Concept ;\n\
         \x20   skos:inScheme ?scheme ;\n\
         \x20   ?labelProperty ?matchingLabel .\n\
         VALUES ?labelProperty { skos:prefLabel skos:altLabel skos:hiddenLabel }\n\
         FILTER regex(str(?matchingLabel), ${pattern}, \"i\")\n"
    };
}

const DESCRIBE: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ${uri} ?p ?o }\n",
    "WHERE { ${uri} ?p ?o }"
);

const LINKED_LABELS: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?target rdf:type ?type . ?target skos:prefLabel ?label . ?target skos:notation ?notation }\n",
    "WHERE {\n",
    "  ${uri} ${predicate} ?target .\n",
    "  FILTER(isIRI(?target))\n",
    "  OPTIONAL { ?target rdf:type ?type }\n",
    "  OPTIONAL { ?target skos:prefLabel ?label }\n",
    "  OPTIONAL { ?target skos:notation ?notation }\n",
    "}"
);

const CONCEPT_SCHEMES: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?scheme ?p ?o }\n",
    "WHERE {\n",
    "  { ${uri} skos:inScheme ?scheme } UNION { ${uri} skos:topConceptOf ?scheme }\n",
    "  ?scheme ?p ?o .\n",
    "  FILTER(?p IN (rdf:type, dcterms:title, skos:prefLabel, rdfs:label))\n",
    "}"
);

const CONCEPT_GROUPS: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?group ?p ?o }\n",
    "WHERE {\n",
    "  ?group a isothes:ConceptGroup ;\n",
    "         skos:member ${uri} ;\n",
    "         ?p ?o .\n",
    "  FILTER(?p IN (rdf:type, skos:prefLabel, rdfs:label, skos:notation, skos:inScheme))\n",
    "}"
);

const SCHEME: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ${uri} ?p ?o }\n",
    "WHERE { ${uri} a skos:ConceptScheme ; ?p ?o }"
);

const SCHEMES: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?scheme ?p ?o }\n",
    "WHERE {\n",
    "  ?scheme a skos:ConceptScheme ; ?p ?o .\n",
    "  FILTER(?p IN (rdf:type, dcterms:title, dcterms:description, skos:prefLabel, rdfs:label))\n",
    "}"
);

const TOP_CONCEPTS: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?concept skos:topConceptOf ${scheme} . ?concept skos:prefLabel ?label . ?concept skos:notation ?notation }\n",
    "WHERE {\n",
    "  { ?concept skos:topConceptOf ${scheme} } UNION { ${scheme} skos:hasTopConcept ?concept }\n",
    "  OPTIONAL { ?concept skos:prefLabel ?label }\n",
    "  OPTIONAL { ?concept skos:notation ?notation }\n",
    "}"
);

const GROUPS: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ?group ?p ?o }\n",
    "WHERE {\n",
    "  ?group a isothes:ConceptGroup ;\n",
    "         skos:inScheme ${scheme} ;\n",
    "         ?p ?o .\n",
    "}"
);

const PROPERTY: &str = concat!(
    prefixes!(),
    "CONSTRUCT { ${uri} ${predicate} ?o }\n",
    "WHERE { ${uri} ${predicate} ?o }"
);

const SEARCH_COUNT: &str = concat!(
    prefixes!(),
    "SELECT (COUNT(*) AS ?count)\n",
    "WHERE {\n",
    "  SELECT DISTINCT ?concept ?scheme ?matchingLabel\n",
    "  WHERE {\n",
    search_match!(),
    "  }\n",
    "}"
);

/// Labels projected by the result query: (variable stem, triple pattern, output variable).
const SEARCH_RESULT_LABELS: [(&str, &str, &str); 2] = [
    ("prefLabel", "?concept skos:prefLabel", vars::CONCEPT_LABEL),
    ("title", "?scheme dcterms:title", vars::SCHEME_TITLE),
];

/// All statements with `uri` as subject.
pub fn describe(uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::DESCRIBE, DESCRIBE).bind_iri(params::URI, uri)
}

/// Type, pref labels and notations of the resources `uri` links to through
/// `predicate`.
pub fn linked_labels(uri: &str, predicate: &str) -> SparqlQuery {
    SparqlQuery::new(names::LINKED_LABELS, LINKED_LABELS)
        .bind_iri(params::URI, uri)
        .bind_iri(params::PREDICATE, predicate)
}

/// Schemes a concept belongs to, with their titles.
pub fn concept_schemes(concept_uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::CONCEPT_SCHEMES, CONCEPT_SCHEMES).bind_iri(params::URI, concept_uri)
}

/// Concept groups listing a concept as member.
pub fn concept_groups(concept_uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::CONCEPT_GROUPS, CONCEPT_GROUPS).bind_iri(params::URI, concept_uri)
}

/// Description of one concept scheme.
pub fn scheme(uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::SCHEME, SCHEME).bind_iri(params::URI, uri)
}

/// Titles and descriptions of every concept scheme.
pub fn schemes() -> SparqlQuery {
    SparqlQuery::new(names::SCHEMES, SCHEMES)
}

/// Top concepts of a scheme, declared from either side.
pub fn top_concepts(scheme_uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::TOP_CONCEPTS, TOP_CONCEPTS).bind_iri(params::SCHEME, scheme_uri)
}

/// Concept groups of a scheme with their members.
pub fn groups(scheme_uri: &str) -> SparqlQuery {
    SparqlQuery::new(names::GROUPS, GROUPS).bind_iri(params::SCHEME, scheme_uri)
}

/// Current values of one predicate of `uri`.
pub fn property(uri: &str, predicate: &str) -> SparqlQuery {
    SparqlQuery::new(names::PROPERTY, PROPERTY)
        .bind_iri(params::URI, uri)
        .bind_iri(params::PREDICATE, predicate)
}

/// Number of (concept, scheme, matching label) tuples for a regex pattern.
pub fn search_count(pattern: &str) -> SparqlQuery {
    SparqlQuery::new(names::SEARCH_COUNT, SEARCH_COUNT).bind_literal(params::PATTERN, pattern)
}

/// Matching (concept, scheme, label) tuples with the concept pref label and
/// scheme title. Ordering and pagination are added by the caller.
///
/// Each label is the first bound of: one per entry of `languages`, in order,
/// then the untagged value, then a value in any language. The languages are
/// bound as `${lang0}`, `${lang1}`, ...
pub fn search_results<S: AsRef<str>>(pattern: &str, languages: &[S]) -> SparqlQuery {
    let mut select = String::from("SELECT ?concept ?scheme ?matchingLabel");
    let mut optionals = String::new();
    for (stem, triple, output) in SEARCH_RESULT_LABELS {
        let mut samples = Vec::with_capacity(languages.len() + 2);
        for rank in 0..languages.len() + 2 {
            let var = format!("{}{}", stem, rank);
            let filter = if rank < languages.len() {
                format!(" FILTER(LCASE(lang(?{})) = ${{{}{}}})", var, params::LANG, rank)
            } else if rank == languages.len() {
                format!(" FILTER(lang(?{}) = \"\")", var)
            } else {
                String::new()
            };
            let _ = writeln!(optionals, "  OPTIONAL {{ {} ?{} .{} }}", triple, var, filter);
            samples.push(format!("SAMPLE(?{})", var));
        }
        let _ = write!(select, " (COALESCE({}) AS ?{})", samples.join(", "), output);
    }
    let template = format!(
        "{}{}\nWHERE {{\n{}{}}}\nGROUP BY ?concept ?scheme ?matchingLabel",
        prefixes!(),
        select,
        search_match!(),
        optionals
    );

    let mut query =
        SparqlQuery::new(names::SEARCH_RESULTS, template).bind_literal(params::PATTERN, pattern);
    for (rank, language) in languages.iter().enumerate() {
        query = query.bind(
            format!("{}{}", params::LANG, rank),
            BindingValue::Literal(language.as_ref().to_lowercase()),
        );
    }
    query
}

/// Predicates whose linked resources are loaded with labels for a concept.
pub const CONCEPT_LINKS: [&str; 3] = [skos::BROADER, skos::NARROWER, skos::RELATED];
