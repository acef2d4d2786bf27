//! Vocabulary IRIs used by the thesaurus model.

/// W3C SKOS core vocabulary.
pub mod skos {
    pub const NS: &str = "http://www.w3.org/2004/02/skos/core#";

    pub const CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#Concept";
    pub const CONCEPT_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#ConceptScheme";
    pub const COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#Collection";
    pub const ORDERED_COLLECTION: &str = "http://www.w3.org/2004/02/skos/core#OrderedCollection";

    pub const PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
    pub const ALT_LABEL: &str = "http://www.w3.org/2004/02/skos/core#altLabel";
    pub const HIDDEN_LABEL: &str = "http://www.w3.org/2004/02/skos/core#hiddenLabel";
    pub const NOTATION: &str = "http://www.w3.org/2004/02/skos/core#notation";

    pub const DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
    pub const SCOPE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#scopeNote";
    pub const NOTE: &str = "http://www.w3.org/2004/02/skos/core#note";
    pub const EXAMPLE: &str = "http://www.w3.org/2004/02/skos/core#example";
    pub const HISTORY_NOTE: &str = "http://www.w3.org/2004/02/skos/core#historyNote";
    pub const EDITORIAL_NOTE: &str = "http://www.w3.org/2004/02/skos/core#editorialNote";
    pub const CHANGE_NOTE: &str = "http://www.w3.org/2004/02/skos/core#changeNote";

    pub const BROADER: &str = "http://www.w3.org/2004/02/skos/core#broader";
    pub const NARROWER: &str = "http://www.w3.org/2004/02/skos/core#narrower";
    pub const RELATED: &str = "http://www.w3.org/2004/02/skos/core#related";
    pub const IN_SCHEME: &str = "http://www.w3.org/2004/02/skos/core#inScheme";
    pub const TOP_CONCEPT_OF: &str = "http://www.w3.org/2004/02/skos/core#topConceptOf";
    pub const HAS_TOP_CONCEPT: &str = "http://www.w3.org/2004/02/skos/core#hasTopConcept";
    pub const MEMBER: &str = "http://www.w3.org/2004/02/skos/core#member";

    pub const EXACT_MATCH: &str = "http://www.w3.org/2004/02/skos/core#exactMatch";
    pub const CLOSE_MATCH: &str = "http://www.w3.org/2004/02/skos/core#closeMatch";
}

/// ISO 25964 SKOS extension (concept groups).
pub mod iso_thes {
    pub const NS: &str = "http://purl.org/iso25964/skos-thes#";

    pub const CONCEPT_GROUP: &str = "http://purl.org/iso25964/skos-thes#ConceptGroup";
    pub const SUPER_GROUP: &str = "http://purl.org/iso25964/skos-thes#superGroup";
    pub const SUB_GROUP: &str = "http://purl.org/iso25964/skos-thes#subGroup";
}

/// Dublin Core terms.
pub mod dcterms {
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub const TITLE: &str = "http://purl.org/dc/terms/title";
    pub const DESCRIPTION: &str = "http://purl.org/dc/terms/description";
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const MODIFIED: &str = "http://purl.org/dc/terms/modified";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const PUBLISHER: &str = "http://purl.org/dc/terms/publisher";
}

/// RDF and RDFS core terms.
pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
}
