//! RDF terms, statements and result rows as returned by a triple store.

use std::collections::BTreeMap;
use std::fmt;

use crate::localized::normalize_language;

/// An RDF term in subject, predicate or object position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named resource.
    Iri(String),
    /// A blank node; the id is only meaningful within one query result.
    BlankNode(String),
    /// A literal, optionally language-tagged or typed.
    Literal {
        value: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    pub fn iri(iri: impl Into<String>) -> Self {
        Self::Iri(iri.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::BlankNode(id.into())
    }

    /// Plain literal without language or datatype.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: None,
        }
    }

    /// Language-tagged literal.
    pub fn lang_literal(value: impl Into<String>, language: &str) -> Self {
        Self::Literal {
            value: value.into(),
            language: normalize_language(Some(language)),
            datatype: None,
        }
    }

    /// Typed literal.
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            language: None,
            datatype: Some(datatype.into()),
        }
    }

    /// The lexical value: IRI, blank node id or literal text.
    pub fn value(&self) -> &str {
        match self {
            Self::Iri(iri) => iri,
            Self::BlankNode(id) => id,
            Self::Literal { value, .. } => value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal { .. })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Self::BlankNode(_))
    }

    /// Language tag of a literal.
    pub fn language(&self) -> Option<&str> {
        match self {
            Self::Literal { language, .. } => language.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::BlankNode(id) => write!(f, "_:{}", id),
            Self::Literal {
                value,
                language: Some(lang),
                ..
            } => write!(f, "\"{}\"@{}", value, lang),
            Self::Literal {
                value,
                datatype: Some(dt),
                ..
            } => write!(f, "\"{}\"^^<{}>", value, dt),
            Self::Literal { value, .. } => write!(f, "\"{}\"", value),
        }
    }
}

/// A (subject, predicate, object) triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    pub subject: Term,
    pub predicate: String,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Term, predicate: impl Into<String>, object: Term) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// One solution of a tuple (SELECT) query: variable name to bound term.
///
/// Unbound variables are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TupleRow {
    bindings: BTreeMap<String, Term>,
}

impl TupleRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style binding, mostly for tests and mocks.
    pub fn with(mut self, variable: impl Into<String>, term: Term) -> Self {
        self.bind(variable, term);
        self
    }

    pub fn bind(&mut self, variable: impl Into<String>, term: Term) {
        self.bindings.insert(variable.into(), term);
    }

    pub fn get(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// Lexical value of a bound variable.
    pub fn value(&self, variable: &str) -> Option<&str> {
        self.get(variable).map(Term::value)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_term_display() {
        assert_eq!(Term::iri("http://ex.org/a").to_string(), "<http://ex.org/a>");
        assert_eq!(Term::blank("b0").to_string(), "_:b0");
        assert_eq!(Term::lang_literal("Appel", "FR").to_string(), "\"Appel\"@fr");
        assert_eq!(
            Term::typed_literal("3", "http://www.w3.org/2001/XMLSchema#integer").to_string(),
            "\"3\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_term_accessors() {
        let lit = Term::lang_literal("Appel", "fr");
        assert!(lit.is_literal());
        assert_eq!(lit.language(), Some("fr"));
        assert_eq!(lit.value(), "Appel");
        assert_eq!(lit.as_iri(), None);
        assert_eq!(Term::iri("http://ex.org/a").as_iri(), Some("http://ex.org/a"));
        assert!(Term::blank("b0").is_blank());
    }

    #[test]
    fn test_tuple_row() {
        let row = TupleRow::new()
            .with("concept", Term::iri("http://ex.org/c1"))
            .with("label", Term::lang_literal("Appel", "fr"));
        assert_eq!(row.len(), 2);
        assert_eq!(row.value("concept"), Some("http://ex.org/c1"));
        assert_eq!(row.get("label").and_then(Term::language), Some("fr"));
        assert!(row.get("scheme").is_none());
    }

    #[test]
    fn test_statement_display() {
        let st = Statement::new(
            Term::iri("http://ex.org/c1"),
            "http://www.w3.org/2004/02/skos/core#prefLabel",
            Term::lang_literal("Appel", "fr"),
        );
        assert_eq!(
            st.to_string(),
            "<http://ex.org/c1> <http://www.w3.org/2004/02/skos/core#prefLabel> \"Appel\"@fr ."
        );
    }
}
