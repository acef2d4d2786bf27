//! Generic RDF resource: a URI with language-tagged properties and
//! associations to other resources.

use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::localized::{LocalizedValue, LocalizedValueSet};

/// Prefix of the pass-scoped keys given to blank-node subjects.
pub const BLANK_NODE_PREFIX: &str = "_bnode:";

/// Whether a resource key stands for a blank node rather than a URI.
pub fn is_blank_key(key: &str) -> bool {
    key.starts_with(BLANK_NODE_PREFIX)
}

/// An RDF resource identified by its URI.
///
/// Literal-valued predicates land in `properties`, resource-valued ones in
/// `associations`. Equality and hashing use the URI alone.
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    uri: String,
    properties: BTreeMap<String, LocalizedValueSet>,
    associations: BTreeMap<String, BTreeSet<String>>,
}

impl Resource {
    /// Create an empty resource.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            properties: BTreeMap::new(),
            associations: BTreeMap::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Whether the resource was built from a blank-node subject.
    pub fn is_blank(&self) -> bool {
        is_blank_key(&self.uri)
    }

    /// Add a literal value for `predicate`.
    pub fn add_property(&mut self, predicate: &str, value: &str, language: Option<&str>) {
        self.properties
            .entry(predicate.to_string())
            .or_default()
            .add(LocalizedValue::new(value, language));
    }

    /// Add a link from this resource to `target` through `predicate`.
    pub fn add_association(&mut self, predicate: &str, target: &str) {
        self.associations
            .entry(predicate.to_string())
            .or_default()
            .insert(target.to_string());
    }

    /// Drop every value of a literal predicate.
    pub fn reset_property(&mut self, predicate: &str) {
        self.properties.remove(predicate);
    }

    /// Drop every target of a resource predicate.
    pub fn reset_association(&mut self, predicate: &str) {
        self.associations.remove(predicate);
    }

    /// Remove every link to a blank-node key. Returns how many were removed.
    pub fn drop_blank_associations(&mut self) -> usize {
        let mut removed = 0;
        self.associations.retain(|_, targets| {
            let before = targets.len();
            targets.retain(|target| !is_blank_key(target));
            removed += before - targets.len();
            !targets.is_empty()
        });
        removed
    }

    /// Values of a literal predicate.
    pub fn property(&self, predicate: &str) -> Option<&LocalizedValueSet> {
        self.properties.get(predicate)
    }

    /// Targets of a resource predicate, in sorted order.
    pub fn associations(&self, predicate: &str) -> impl Iterator<Item = &str> {
        self.associations
            .get(predicate)
            .into_iter()
            .flat_map(|targets| targets.iter().map(String::as_str))
    }

    /// Whether `target` is linked through `predicate`.
    pub fn has_association(&self, predicate: &str, target: &str) -> bool {
        self.associations
            .get(predicate)
            .is_some_and(|targets| targets.contains(target))
    }

    /// Literal predicates present on this resource.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Resource predicates present on this resource.
    pub fn association_names(&self) -> impl Iterator<Item = &str> {
        self.associations.keys().map(String::as_str)
    }

    /// Best value of a literal predicate for the given language priority,
    /// falling back to the neutral value, then to any value.
    pub fn first_property_value<S: AsRef<str>>(
        &self,
        predicate: &str,
        languages: &[S],
    ) -> Option<&LocalizedValue> {
        let values = self.property(predicate)?;
        values
            .first_for_languages(languages)
            .or_else(|| values.first_or_default())
    }

    /// Whether two resources hold the same properties and associations.
    pub fn same_content(&self, other: &Resource) -> bool {
        self.properties == other.properties && self.associations == other.associations
    }

    /// Copy every property and association of `other` into this resource.
    pub fn merge_from(&mut self, other: &Resource) {
        for (predicate, values) in &other.properties {
            let target = self.properties.entry(predicate.clone()).or_default();
            for value in values.values() {
                target.add(value.clone());
            }
        }
        for (predicate, targets) in &other.associations {
            self.associations
                .entry(predicate.clone())
                .or_default()
                .extend(targets.iter().cloned());
        }
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.uri.hash(state);
    }
}
