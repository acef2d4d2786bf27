//! Typed SKOS entities layered on [`Resource`].
//!
//! Each entity wraps the resource the materializer built for its URI and adds
//! label resolution plus typed accessors for the predicates the thesaurus
//! browser shows. Related entities (broader concepts, parent schemes, group
//! members, ...) are filled by secondary queries in the store crate.

use serde::Serialize;

use crate::localized::{LocalizedValue, LocalizedValueSet};
use crate::resource::Resource;
use crate::vocab::{dcterms, iso_thes, rdf, skos};

/// Entity kinds the graph materializer can build.
///
/// The materializer creates a fresh instance per subject through
/// [`Materializable::from_uri`] and feeds triples into its resource.
pub trait Materializable: Sized {
    /// Create an empty entity for a URI (or pass-scoped blank-node key).
    fn from_uri(uri: &str) -> Self;

    fn resource(&self) -> &Resource;

    fn resource_mut(&mut self) -> &mut Resource;
}

impl Materializable for Resource {
    fn from_uri(uri: &str) -> Self {
        Resource::new(uri)
    }

    fn resource(&self) -> &Resource {
        self
    }

    fn resource_mut(&mut self) -> &mut Resource {
        self
    }
}

/// Label resolution shared by every typed entity.
pub trait Entity: Materializable {
    /// Predicates holding the display label, most specific first.
    fn label_predicates(&self) -> &'static [&'static str] {
        &[skos::PREF_LABEL, rdf::LABEL, dcterms::TITLE]
    }

    fn uri(&self) -> &str {
        self.resource().uri()
    }

    /// Best label for the language priority list, falling back to the
    /// neutral label, then to a label in any language. Predicates are tried
    /// in order at each step.
    fn label_value<S: AsRef<str>>(&self, languages: &[S]) -> Option<&LocalizedValue> {
        let predicates = self.label_predicates();
        predicates
            .iter()
            .find_map(|predicate| {
                self.resource()
                    .property(predicate)
                    .and_then(|values| values.first_for_languages(languages))
            })
            .or_else(|| {
                predicates.iter().find_map(|predicate| {
                    self.resource()
                        .property(predicate)
                        .and_then(LocalizedValueSet::first_or_default)
                })
            })
    }

    /// Display label: best label, or the URI itself when none applies.
    fn label<S: AsRef<str>>(&self, languages: &[S]) -> String {
        self.label_value(languages)
            .map(|value| value.value().to_string())
            .unwrap_or_else(|| self.uri().to_string())
    }
}

fn neutral_strings(values: Option<&LocalizedValueSet>) -> Vec<String> {
    values
        .map(|set| set.values().map(|v| v.value().to_string()).collect())
        .unwrap_or_default()
}

// =============================================================================
// ENTRY
// =============================================================================

/// Any labelled resource: the fallback view when the kind is not known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    #[serde(flatten)]
    resource: Resource,
}

impl Entry {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            resource: Resource::new(uri),
        }
    }

    pub fn from_resource(resource: Resource) -> Self {
        Self { resource }
    }

    pub fn into_resource(self) -> Resource {
        self.resource
    }

    /// `rdf:type` values of the entry.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(rdf::TYPE)
    }
}

impl Materializable for Entry {
    fn from_uri(uri: &str) -> Self {
        Self::new(uri)
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Entity for Entry {}

// =============================================================================
// CONCEPT
// =============================================================================

/// A `skos:Concept` with its related entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    #[serde(flatten)]
    resource: Resource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub broader: Vec<Concept>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub narrower: Vec<Concept>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<Concept>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub schemes: Vec<ConceptScheme>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConceptGroup>,
}

impl Concept {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(uri))
    }

    /// Build a concept view over an existing resource's state.
    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            broader: Vec::new(),
            narrower: Vec::new(),
            related: Vec::new(),
            schemes: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn pref_labels(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(skos::PREF_LABEL)
    }

    pub fn alt_labels(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(skos::ALT_LABEL)
    }

    pub fn hidden_labels(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(skos::HIDDEN_LABEL)
    }

    pub fn definitions(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(skos::DEFINITION)
    }

    pub fn scope_notes(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(skos::SCOPE_NOTE)
    }

    pub fn notations(&self) -> Vec<String> {
        neutral_strings(self.resource.property(skos::NOTATION))
    }

    pub fn broader_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::BROADER)
    }

    pub fn narrower_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::NARROWER)
    }

    pub fn related_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::RELATED)
    }

    /// Schemes the concept belongs to, through `skos:inScheme` or
    /// `skos:topConceptOf`, without duplicates.
    pub fn scheme_uris(&self) -> Vec<&str> {
        let mut uris: Vec<&str> = self
            .resource
            .associations(skos::IN_SCHEME)
            .chain(self.resource.associations(skos::TOP_CONCEPT_OF))
            .collect();
        uris.sort_unstable();
        uris.dedup();
        uris
    }

    /// Whether the concept is a top concept of `scheme_uri`.
    pub fn is_top_concept_of(&self, scheme_uri: &str) -> bool {
        self.resource.has_association(skos::TOP_CONCEPT_OF, scheme_uri)
    }
}

impl Materializable for Concept {
    fn from_uri(uri: &str) -> Self {
        Self::new(uri)
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Entity for Concept {}

// =============================================================================
// CONCEPT SCHEME
// =============================================================================

/// A `skos:ConceptScheme`: one vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptScheme {
    #[serde(flatten)]
    resource: Resource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub top_concepts: Vec<Concept>,
}

impl ConceptScheme {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(uri))
    }

    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            top_concepts: Vec::new(),
        }
    }

    pub fn titles(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(dcterms::TITLE)
    }

    pub fn descriptions(&self) -> Option<&LocalizedValueSet> {
        self.resource.property(dcterms::DESCRIPTION)
    }

    pub fn top_concept_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::HAS_TOP_CONCEPT)
    }
}

impl Materializable for ConceptScheme {
    fn from_uri(uri: &str) -> Self {
        Self::new(uri)
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Entity for ConceptScheme {
    fn label_predicates(&self) -> &'static [&'static str] {
        &[dcterms::TITLE, skos::PREF_LABEL, rdf::LABEL]
    }
}

// =============================================================================
// CONCEPT GROUP
// =============================================================================

/// An ISO 25964 concept group (micro-thesaurus, theme, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptGroup {
    #[serde(flatten)]
    resource: Resource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Concept>,
}

impl ConceptGroup {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(uri))
    }

    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            members: Vec::new(),
        }
    }

    pub fn member_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::MEMBER)
    }

    pub fn scheme_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::IN_SCHEME)
    }

    pub fn sub_group_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(iso_thes::SUB_GROUP)
    }

    pub fn super_group_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(iso_thes::SUPER_GROUP)
    }

    pub fn notations(&self) -> Vec<String> {
        neutral_strings(self.resource.property(skos::NOTATION))
    }
}

impl Materializable for ConceptGroup {
    fn from_uri(uri: &str) -> Self {
        Self::new(uri)
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Entity for ConceptGroup {}

// =============================================================================
// COLLECTION
// =============================================================================

/// A `skos:Collection` of concepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    #[serde(flatten)]
    resource: Resource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Concept>,
}

impl Collection {
    pub fn new(uri: impl Into<String>) -> Self {
        Self::from_resource(Resource::new(uri))
    }

    pub fn from_resource(resource: Resource) -> Self {
        Self {
            resource,
            members: Vec::new(),
        }
    }

    pub fn member_uris(&self) -> impl Iterator<Item = &str> {
        self.resource.associations(skos::MEMBER)
    }
}

impl Materializable for Collection {
    fn from_uri(uri: &str) -> Self {
        Self::new(uri)
    }

    fn resource(&self) -> &Resource {
        &self.resource
    }

    fn resource_mut(&mut self) -> &mut Resource {
        &mut self.resource
    }
}

impl Entity for Collection {}
