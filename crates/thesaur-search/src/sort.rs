//! Mapping of search sort criteria onto result query variables.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thesaur_core::{OrderKey, SortCriterion, SortDirection, SortField};
use thesaur_store::sparql::vars;

/// Result variable each sort field orders on.
static SORT_VARIABLES: Lazy<HashMap<SortField, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (SortField::SchemeTitle, vars::SCHEME_TITLE),
        (SortField::ConceptLabel, vars::CONCEPT_LABEL),
        (SortField::MatchingLabel, vars::MATCHING_LABEL),
        (SortField::ConceptUri, vars::CONCEPT),
        (SortField::SchemeUri, vars::SCHEME),
    ])
});

/// Order used when a query carries no sort criteria.
pub static DEFAULT_SORT: Lazy<Vec<SortCriterion>> = Lazy::new(|| {
    vec![
        SortCriterion::asc(SortField::SchemeTitle),
        SortCriterion::asc(SortField::ConceptLabel),
    ]
});

/// Result variable for a sort field.
pub fn sort_variable(field: SortField) -> &'static str {
    SORT_VARIABLES.get(&field).copied().unwrap_or(vars::CONCEPT)
}

/// Keys appended after the criteria so every row has a fixed position.
const TIE_BREAKERS: [&str; 2] = [vars::CONCEPT, vars::MATCHING_LABEL];

/// ORDER BY keys for the given criteria, most significant first.
///
/// Rows the criteria leave tied are ordered by concept URI, then matching
/// label, unless the criteria already order on those variables.
pub fn order_keys(criteria: &[SortCriterion]) -> Vec<OrderKey> {
    let criteria = if criteria.is_empty() {
        DEFAULT_SORT.as_slice()
    } else {
        criteria
    };
    let mut keys: Vec<OrderKey> = criteria
        .iter()
        .map(|c| OrderKey::new(sort_variable(c.field), c.direction))
        .collect();
    for variable in TIE_BREAKERS {
        if !keys.iter().any(|k| k.variable == variable) {
            keys.push(OrderKey::new(variable, SortDirection::Asc));
        }
    }
    keys
}
