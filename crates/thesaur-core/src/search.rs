//! Concept search request and response types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// SORT CRITERIA
// =============================================================================

/// Fields a search result page can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Title of the scheme the concept belongs to.
    SchemeTitle,
    /// Preferred label of the concept.
    ConceptLabel,
    /// The label that matched the query (pref, alt or hidden).
    MatchingLabel,
    /// Concept URI.
    ConceptUri,
    /// Scheme URI.
    SchemeUri,
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemeTitle => write!(f, "scheme_title"),
            Self::ConceptLabel => write!(f, "concept_label"),
            Self::MatchingLabel => write!(f, "matching_label"),
            Self::ConceptUri => write!(f, "concept_uri"),
            Self::SchemeUri => write!(f, "scheme_uri"),
        }
    }
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "scheme_title" | "scheme" => Ok(Self::SchemeTitle),
            "concept_label" | "label" | "pref_label" => Ok(Self::ConceptLabel),
            "matching_label" | "match" => Ok(Self::MatchingLabel),
            "concept_uri" | "concept" => Ok(Self::ConceptUri),
            "scheme_uri" => Ok(Self::SchemeUri),
            _ => Err(Error::InvalidSearchParameters(format!(
                "unknown sort field: {}",
                s
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(Error::InvalidSearchParameters(format!(
                "unknown sort direction: {}",
                s
            ))),
        }
    }
}

/// One (field, direction) sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortCriterion {
    pub field: SortField,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortCriterion {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub const fn asc(field: SortField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub const fn desc(field: SortField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Parses `field` or `field:direction`, e.g. `scheme_title:desc`.
impl FromStr for SortCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((field, direction)) => Ok(Self::new(field.trim().parse()?, direction.trim().parse()?)),
            None => Ok(Self::asc(s.trim().parse()?)),
        }
    }
}

// =============================================================================
// QUERY
// =============================================================================

/// A free-text concept search with pagination and sort criteria.
///
/// # Example
///
/// ```
/// use thesaur_core::{SearchQuery, SortField};
///
/// let query = SearchQuery::new("appel urgent")
///     .with_offset(20)
///     .with_page_size(10)
///     .sort_desc(SortField::SchemeTitle);
///
/// assert!(query.validate().is_ok());
/// assert_eq!(query.page_number(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text; whitespace separates terms.
    pub text: String,

    /// Index of the first result (0-based).
    #[serde(default)]
    pub offset: i64,

    /// Maximum number of results per page.
    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Sort keys, most significant first. Empty means the default order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort_criteria: Vec<SortCriterion>,
}

fn default_page_size() -> i64 {
    defaults::PAGE_SIZE_SEARCH
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: defaults::PAGE_OFFSET,
            page_size: defaults::PAGE_SIZE_SEARCH,
            sort_criteria: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size;
        self
    }

    /// Append a sort key.
    pub fn sort_by(mut self, criterion: SortCriterion) -> Self {
        self.sort_criteria.push(criterion);
        self
    }

    pub fn sort_asc(self, field: SortField) -> Self {
        self.sort_by(SortCriterion::asc(field))
    }

    pub fn sort_desc(self, field: SortField) -> Self {
        self.sort_by(SortCriterion::desc(field))
    }

    /// Check the pagination preconditions.
    pub fn validate(&self) -> Result<()> {
        if self.page_size <= 0 {
            return Err(Error::InvalidSearchParameters(format!(
                "page size must be positive, got {}",
                self.page_size
            )));
        }
        if self.offset < 0 {
            return Err(Error::InvalidSearchParameters(format!(
                "offset must not be negative, got {}",
                self.offset
            )));
        }
        Ok(())
    }

    /// 1-based page number: `1 + offset / page_size`.
    ///
    /// Only meaningful for a query that passed [`SearchQuery::validate`].
    pub fn page_number(&self) -> i64 {
        if self.page_size <= 0 {
            return 1;
        }
        1 + self.offset / self.page_size
    }
}

// =============================================================================
// RESULTS
// =============================================================================

/// One matching concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub concept_uri: String,
    pub scheme_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concept_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme_title: Option<String>,
    /// The label the pattern matched.
    pub matching_label: String,
    /// HTML-escaped excerpt of `matching_label` with the match highlighted.
    pub highlighted_excerpt: String,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultsPage {
    pub original_query: SearchQuery,
    pub total_matches: i64,
    /// 1-based page number.
    pub page_number: i64,
    pub results: Vec<SearchResult>,
}

impl SearchResultsPage {
    pub fn new(original_query: SearchQuery, total_matches: i64, results: Vec<SearchResult>) -> Self {
        let page_number = original_query.page_number();
        Self {
            original_query,
            total_matches,
            page_number,
            results,
        }
    }

    /// Number of pages needed for every match.
    pub fn page_count(&self) -> i64 {
        let size = self.original_query.page_size.max(1);
        (self.total_matches + size - 1) / size
    }

    pub fn has_next_page(&self) -> bool {
        self.page_number < self.page_count()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
