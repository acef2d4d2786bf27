//! Language-tagged literal values.
//!
//! A [`LocalizedValue`] is the text of an RDF literal together with its
//! language tag. A [`LocalizedValueSet`] groups the values of one property by
//! language, with the untagged ("neutral") values under their own bucket.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Normalize a language tag: tags are case-insensitive and an empty tag means
/// no language.
pub fn normalize_language(language: Option<&str>) -> Option<String> {
    match language.map(str::trim) {
        Some(tag) if !tag.is_empty() => Some(tag.to_ascii_lowercase()),
        _ => None,
    }
}

/// Immutable language-tagged string.
///
/// Two values with the same text but different language tags are distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalizedValue {
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl LocalizedValue {
    /// Create a value; the language tag is normalized to lowercase.
    pub fn new(value: impl Into<String>, language: Option<&str>) -> Self {
        Self {
            value: value.into(),
            language: normalize_language(language),
        }
    }

    /// Create a value without a language tag.
    pub fn neutral(value: impl Into<String>) -> Self {
        Self::new(value, None)
    }

    /// The literal text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Whether the value has no language tag.
    pub fn is_neutral(&self) -> bool {
        self.language.is_none()
    }

    /// Consume the value and return its text.
    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for LocalizedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.language {
            Some(lang) => write!(f, "\"{}\"@{}", self.value, lang),
            None => write!(f, "\"{}\"", self.value),
        }
    }
}

/// Values of one property, bucketed by language.
///
/// Each value lives in exactly one bucket (the one of its own language tag,
/// `None` for neutral values) and duplicates collapse. Buckets and the values
/// inside them iterate in sorted order, so two sets holding the same values
/// compare equal whatever order the values were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedValueSet {
    buckets: BTreeMap<Option<String>, BTreeSet<LocalizedValue>>,
}

impl LocalizedValueSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. Returns false if the (value, language) pair was present.
    pub fn add(&mut self, value: LocalizedValue) -> bool {
        self.buckets
            .entry(value.language.clone())
            .or_default()
            .insert(value)
    }

    /// Remove every value.
    pub fn clear(&mut self) {
        self.buckets.clear();
    }

    /// Whether the set holds no value.
    pub fn is_empty(&self) -> bool {
        self.buckets.values().all(BTreeSet::is_empty)
    }

    /// Total number of values across all languages.
    pub fn len(&self) -> usize {
        self.buckets.values().map(BTreeSet::len).sum()
    }

    /// Whether the exact (value, language) pair is present.
    pub fn contains(&self, value: &LocalizedValue) -> bool {
        self.buckets
            .get(&value.language)
            .is_some_and(|bucket| bucket.contains(value))
    }

    /// Any value, neutral values first.
    pub fn first_or_default(&self) -> Option<&LocalizedValue> {
        self.buckets.values().flat_map(BTreeSet::iter).next()
    }

    /// First value in the first requested language that has one, falling
    /// back to the neutral bucket.
    pub fn first_for_languages<S: AsRef<str>>(&self, languages: &[S]) -> Option<&LocalizedValue> {
        languages
            .iter()
            .find_map(|lang| self.first_in(Some(lang.as_ref())))
            .or_else(|| self.first_in(None))
    }

    /// First value carrying exactly this language (`None` for neutral).
    pub fn first_in(&self, language: Option<&str>) -> Option<&LocalizedValue> {
        self.buckets
            .get(&normalize_language(language))
            .and_then(|bucket| bucket.iter().next())
    }

    /// Every value, bucket by bucket.
    pub fn values(&self) -> impl Iterator<Item = &LocalizedValue> {
        self.buckets.values().flat_map(BTreeSet::iter)
    }

    /// Values for the requested languages, in the order the languages were
    /// requested.
    pub fn values_for_languages<S: AsRef<str>>(&self, languages: &[S]) -> Vec<&LocalizedValue> {
        languages
            .iter()
            .filter_map(|lang| self.buckets.get(&normalize_language(Some(lang.as_ref()))))
            .flat_map(BTreeSet::iter)
            .collect()
    }

    /// Values carrying exactly this language (`None` for neutral).
    pub fn values_in(&self, language: Option<&str>) -> impl Iterator<Item = &LocalizedValue> {
        self.buckets
            .get(&normalize_language(language))
            .into_iter()
            .flat_map(BTreeSet::iter)
    }

    /// Languages with at least one value; `None` stands for neutral.
    pub fn languages(&self) -> impl Iterator<Item = Option<&str>> {
        self.buckets
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(lang, _)| lang.as_deref())
    }
}

impl Serialize for LocalizedValueSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.values())
    }
}

impl FromIterator<LocalizedValue> for LocalizedValueSet {
    fn from_iter<I: IntoIterator<Item = LocalizedValue>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.add(value);
        }
        set
    }
}
