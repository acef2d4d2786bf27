//! Core traits for thesaur abstractions.
//!
//! The triple store is the single external collaborator of the core: it runs
//! parameterized SPARQL queries and returns either statements (CONSTRUCT /
//! DESCRIBE) or solution rows (SELECT).

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::rdf::{Statement, TupleRow};
use crate::search::SortDirection;

// =============================================================================
// QUERY
// =============================================================================

/// Value substituted for a `${name}` placeholder in a query template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    /// Rendered as `<iri>`.
    Iri(String),
    /// Rendered as an escaped plain string literal.
    Literal(String),
    /// Rendered as an escaped language-tagged literal.
    LangLiteral(String, String),
    /// Rendered as a bare integer.
    Integer(i64),
}

impl BindingValue {
    /// The SPARQL syntax for this value.
    pub fn to_sparql(&self) -> Result<String> {
        match self {
            Self::Iri(iri) => {
                if let Some(c) = iri.chars().find(|c| is_forbidden_in_iri(*c)) {
                    return Err(Error::InvalidSearchParameters(format!(
                        "character {:?} is not allowed in IRI {}",
                        c, iri
                    )));
                }
                Ok(format!("<{}>", iri))
            }
            Self::Literal(value) => Ok(format!("\"{}\"", escape_literal(value))),
            Self::LangLiteral(value, lang) => {
                if lang.is_empty() || !lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                    return Err(Error::InvalidSearchParameters(format!(
                        "invalid language tag: {:?}",
                        lang
                    )));
                }
                Ok(format!("\"{}\"@{}", escape_literal(value), lang))
            }
            Self::Integer(n) => Ok(n.to_string()),
        }
    }
}

fn is_forbidden_in_iri(c: char) -> bool {
    c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
}

/// Escape a string for a double-quoted SPARQL literal.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// One ORDER BY key: a projected variable and a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderKey {
    pub variable: String,
    pub direction: SortDirection,
}

impl OrderKey {
    pub fn new(variable: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            variable: variable.into(),
            direction,
        }
    }

    fn to_sparql(&self) -> String {
        match self.direction {
            SortDirection::Asc => format!("ASC(?{})", self.variable),
            SortDirection::Desc => format!("DESC(?{})", self.variable),
        }
    }
}

/// A parameterized SPARQL query ready to be sent to a [`TripleStore`].
///
/// The template holds `${name}` placeholders; bindings, ORDER BY keys and
/// pagination are kept structured until [`SparqlQuery::render`] so that
/// stores and test doubles can inspect them.
///
/// # Example
///
/// ```
/// use thesaur_core::{BindingValue, SparqlQuery};
///
/// let query = SparqlQuery::new("labels", "SELECT ?l WHERE { ${c} ?p ?l }")
///     .bind("c", BindingValue::Iri("http://ex.org/c1".into()))
///     .with_limit(10);
///
/// assert_eq!(
///     query.render().unwrap(),
///     "SELECT ?l WHERE { <http://ex.org/c1> ?p ?l }\nLIMIT 10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlQuery {
    name: String,
    template: String,
    bindings: BTreeMap<String, BindingValue>,
    order_by: Vec<OrderKey>,
    offset: Option<i64>,
    limit: Option<i64>,
    timeout: Option<Duration>,
}

impl SparqlQuery {
    /// Create a query from a named template.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            bindings: BTreeMap::new(),
            order_by: Vec::new(),
            offset: None,
            limit: None,
            timeout: None,
        }
    }

    pub fn bind(mut self, name: impl Into<String>, value: BindingValue) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    pub fn bind_iri(self, name: impl Into<String>, iri: impl Into<String>) -> Self {
        self.bind(name, BindingValue::Iri(iri.into()))
    }

    pub fn bind_literal(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.bind(name, BindingValue::Literal(value.into()))
    }

    pub fn order_by(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Template name, for logs and error context.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn binding(&self, name: &str) -> Option<&BindingValue> {
        self.bindings.get(name)
    }

    pub fn order_keys(&self) -> &[OrderKey] {
        &self.order_by
    }

    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Produce the final SPARQL text.
    ///
    /// Fails if a placeholder has no binding or a bound value cannot be
    /// expressed safely.
    pub fn render(&self) -> Result<String> {
        let mut out = String::with_capacity(self.template.len() + 64);
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                Error::query(
                    format!("render {}", self.name),
                    "unterminated placeholder in template",
                )
            })?;
            let key = &after[..end];
            let value = self.bindings.get(key).ok_or_else(|| {
                Error::query(
                    format!("render {}", self.name),
                    format!("no binding for placeholder ${{{}}}", key),
                )
            })?;
            out.push_str(&value.to_sparql()?);
            rest = &after[end + 1..];
        }
        out.push_str(rest);

        if !self.order_by.is_empty() {
            let keys: Vec<String> = self.order_by.iter().map(OrderKey::to_sparql).collect();
            let _ = write!(out, "\nORDER BY {}", keys.join(" "));
        }
        if let Some(limit) = self.limit {
            let _ = write!(out, "\nLIMIT {}", limit);
        }
        if let Some(offset) = self.offset {
            let _ = write!(out, "\nOFFSET {}", offset);
        }
        Ok(out)
    }
}

// =============================================================================
// TRIPLE STORE
// =============================================================================

/// Executor for SPARQL queries against the thesaurus triple store.
///
/// Implementations release every per-query resource (response bodies,
/// connections) before returning, on success and on error.
#[async_trait]
pub trait TripleStore: Send + Sync {
    /// Run a CONSTRUCT/DESCRIBE query and return its statements.
    async fn run_graph_query(&self, query: &SparqlQuery) -> Result<Vec<Statement>>;

    /// Run a SELECT query and return its solution rows.
    async fn run_tuple_query(&self, query: &SparqlQuery) -> Result<Vec<TupleRow>>;
}

#[async_trait]
impl<T: TripleStore + ?Sized> TripleStore for Arc<T> {
    async fn run_graph_query(&self, query: &SparqlQuery) -> Result<Vec<Statement>> {
        (**self).run_graph_query(query).await
    }

    async fn run_tuple_query(&self, query: &SparqlQuery) -> Result<Vec<TupleRow>> {
        (**self).run_tuple_query(query).await
    }
}
