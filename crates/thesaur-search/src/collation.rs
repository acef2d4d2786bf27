//! Locale-aware natural ordering of labels.
//!
//! A [`NaturalKey`] splits a label into digit runs and text runs so that
//! `"Photo-83.jpg"` sorts before `"Photo-138.jpg"`. Text runs are compared
//! with an ICU collator for the label's language; digit runs by magnitude,
//! whatever their length.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

use icu_collator::{Collator, CollatorOptions};
use icu_locid::Locale;
use icu_provider::DataLocale;
use lru::LruCache;
use thesaur_core::{defaults, Error, LocalizedValue, LocalizedValueSet, Result};
use tracing::{debug, warn};

// =============================================================================
// NATURAL KEY
// =============================================================================

/// One run of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// A digit run, leading zeros stripped (`""` is zero).
    Integer(String),
    /// A maximal non-digit run.
    Text(String),
}

impl KeyPart {
    fn compare_by<F>(&self, other: &KeyPart, compare_text: &F) -> Ordering
    where
        F: Fn(&str, &str) -> Ordering,
    {
        match (self, other) {
            (KeyPart::Integer(a), KeyPart::Integer(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (KeyPart::Integer(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Integer(_)) => Ordering::Greater,
            (KeyPart::Text(a), KeyPart::Text(b)) => compare_text(a, b),
        }
    }
}

/// Sort key splitting text into alternating digit and text runs.
///
/// # Example
///
/// ```
/// use thesaur_search::collation::NaturalKey;
///
/// let a = NaturalKey::new("5th century");
/// let b = NaturalKey::new("19th century");
/// assert!(a.compare_by(&b, |x, y| x.cmp(y)).is_lt());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaturalKey {
    source: String,
    parts: Vec<KeyPart>,
}

impl NaturalKey {
    pub fn new(text: &str) -> Self {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut in_digits = false;

        for c in text.chars() {
            let is_digit = c.is_ascii_digit();
            if !current.is_empty() && is_digit != in_digits {
                parts.push(Self::part(std::mem::take(&mut current), in_digits));
            }
            in_digits = is_digit;
            current.push(c);
        }
        if !current.is_empty() {
            parts.push(Self::part(current, in_digits));
        }

        Self {
            source: text.to_string(),
            parts,
        }
    }

    fn part(run: String, digits: bool) -> KeyPart {
        if digits {
            KeyPart::Integer(run.trim_start_matches('0').to_string())
        } else {
            KeyPart::Text(run)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// Compare part by part with `compare_text` for text runs. When every
    /// shared part is equal, the key with fewer parts sorts first.
    pub fn compare_by<F>(&self, other: &NaturalKey, compare_text: F) -> Ordering
    where
        F: Fn(&str, &str) -> Ordering,
    {
        self.parts
            .iter()
            .zip(other.parts.iter())
            .map(|(a, b)| a.compare_by(b, &compare_text))
            .find(|ord| ord.is_ne())
            .unwrap_or_else(|| self.parts.len().cmp(&other.parts.len()))
    }

    /// Compare with a locale collator.
    pub fn compare(&self, other: &NaturalKey, collator: &Collator) -> Ordering {
        self.compare_by(other, |a, b| collator.compare(a, b))
    }
}

// =============================================================================
// COLLATOR CACHE
// =============================================================================

/// Bounded cache of collators keyed by language tag (`None` for the root
/// collation used with untagged labels).
pub struct CollatorCache {
    cache: Mutex<LruCache<Option<String>, Arc<Collator>>>,
}

impl CollatorCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Collator for a language, created on first use.
    ///
    /// Unparseable tags fall back to the root collation.
    pub fn get(&self, language: Option<&str>) -> Result<Arc<Collator>> {
        let key = language.map(str::to_lowercase);
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(collator) = cache.get(&key) {
            return Ok(Arc::clone(collator));
        }

        let collator = Arc::new(create_collator(key.as_deref())?);
        cache.put(key, Arc::clone(&collator));
        Ok(collator)
    }

    pub fn len(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CollatorCache {
    fn default() -> Self {
        Self::new(defaults::COLLATOR_CACHE_SIZE)
    }
}

impl std::fmt::Debug for CollatorCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollatorCache").field("len", &self.len()).finish()
    }
}

fn create_collator(language: Option<&str>) -> Result<Collator> {
    let locale = match language {
        Some(tag) => match tag.parse::<Locale>() {
            Ok(locale) => DataLocale::from(&locale),
            Err(e) => {
                warn!(language = tag, error = %e, "Invalid language tag, using root collation");
                DataLocale::default()
            }
        },
        None => DataLocale::default(),
    };

    debug!(language = ?language, "Creating collator");
    Collator::try_new(&locale, CollatorOptions::new())
        .map_err(|e| Error::Config(format!("cannot create collator for {:?}: {}", language, e)))
}

// =============================================================================
// LABEL SORTER
// =============================================================================

/// Sort group of a label: priority languages by rank, then other tagged
/// languages by tag, then untagged labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum LanguageGroup {
    Preferred(usize),
    Other(String),
    Neutral,
}

/// Sorts labels by language priority, then naturally within a language.
#[derive(Debug)]
pub struct LabelSorter<'a> {
    collators: &'a CollatorCache,
    languages: Vec<String>,
}

impl<'a> LabelSorter<'a> {
    pub fn new<S: AsRef<str>>(collators: &'a CollatorCache, languages: &[S]) -> Self {
        Self {
            collators,
            languages: languages.iter().map(|l| l.as_ref().to_lowercase()).collect(),
        }
    }

    fn group(&self, language: Option<&str>) -> LanguageGroup {
        match language {
            None => LanguageGroup::Neutral,
            Some(tag) => match self.languages.iter().position(|l| l == tag) {
                Some(rank) => LanguageGroup::Preferred(rank),
                None => LanguageGroup::Other(tag.to_string()),
            },
        }
    }

    /// Sort localized labels in place.
    pub fn sort(&self, labels: &mut [LocalizedValue]) -> Result<()> {
        let mut collators: HashMap<Option<String>, Arc<Collator>> = HashMap::new();
        for label in labels.iter() {
            let key = label.language().map(str::to_string);
            if !collators.contains_key(&key) {
                let collator = self.collators.get(key.as_deref())?;
                collators.insert(key, collator);
            }
        }

        let mut keyed: Vec<(LanguageGroup, NaturalKey, LocalizedValue)> = labels
            .iter()
            .map(|label| {
                (
                    self.group(label.language()),
                    NaturalKey::new(label.value()),
                    label.clone(),
                )
            })
            .collect();

        keyed.sort_by(|(ga, ka, la), (gb, kb, _)| {
            ga.cmp(gb).then_with(|| {
                // Same group means same language.
                match collators.get(&la.language().map(str::to_string)) {
                    Some(collator) => ka.compare(kb, collator),
                    None => ka.compare_by(kb, |a, b| a.cmp(b)),
                }
            })
        });

        for (slot, (_, _, label)) in labels.iter_mut().zip(keyed) {
            *slot = label;
        }
        Ok(())
    }

    /// Values of a label set in sorted order. A missing set gives no labels.
    pub fn sorted(&self, labels: Option<&LocalizedValueSet>) -> Result<Vec<LocalizedValue>> {
        let mut values: Vec<LocalizedValue> = labels
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default();
        self.sort(&mut values)?;
        Ok(values)
    }

    /// Sort arbitrary items by a display label, using the collator of the
    /// first priority language.
    pub fn sort_by_label<T, F>(&self, items: &mut [T], label_of: F) -> Result<()>
    where
        F: Fn(&T) -> String,
    {
        let collator = self.collators.get(self.languages.first().map(String::as_str))?;
        let mut keyed: Vec<(NaturalKey, usize)> = items
            .iter()
            .enumerate()
            .map(|(i, item)| (NaturalKey::new(&label_of(item)), i))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| a.compare(b, &collator));

        let order: Vec<usize> = keyed.into_iter().map(|(_, i)| i).collect();
        apply_permutation(items, order);
        Ok(())
    }
}

/// Reorder `items` so that position `k` holds the element previously at
/// `order[k]`.
fn apply_permutation<T>(items: &mut [T], mut order: Vec<usize>) {
    for start in 0..order.len() {
        let mut current = start;
        while order[current] != start {
            let next = order[current];
            items.swap(current, next);
            order[current] = current;
            current = next;
        }
        order[current] = current;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(a: &NaturalKey, b: &NaturalKey) -> Ordering {
        a.compare_by(b, |x, y| x.cmp(y))
    }

    #[test]
    fn test_split_into_parts() {
        let key = NaturalKey::new("Photo-083.jpg");
        assert_eq!(
            key.parts(),
            &[
                KeyPart::Text("Photo-".to_string()),
                KeyPart::Integer("83".to_string()),
                KeyPart::Text(".jpg".to_string()),
            ]
        );
        assert_eq!(key.as_str(), "Photo-083.jpg");
        assert!(NaturalKey::new("").parts().is_empty());
    }

    #[test]
    fn test_numbers_by_magnitude() {
        assert_eq!(plain(&NaturalKey::new("5th century"), &NaturalKey::new("19th century")), Ordering::Less);
        assert_eq!(plain(&NaturalKey::new("Photo-83.jpg"), &NaturalKey::new("Photo-138.jpg")), Ordering::Less);
        assert_eq!(plain(&NaturalKey::new("007"), &NaturalKey::new("7")), Ordering::Equal);
        assert_eq!(plain(&NaturalKey::new("0"), &NaturalKey::new("1")), Ordering::Less);
    }

    #[test]
    fn test_numbers_longer_than_u64() {
        let a = NaturalKey::new("x99999999999999999999999");
        let b = NaturalKey::new("x100000000000000000000000");
        assert_eq!(plain(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_integer_before_text() {
        assert_eq!(plain(&NaturalKey::new("1abc"), &NaturalKey::new("abc")), Ordering::Less);
        assert_eq!(plain(&NaturalKey::new("abc"), &NaturalKey::new("1abc")), Ordering::Greater);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(plain(&NaturalKey::new("Article"), &NaturalKey::new("Article 2")), Ordering::Less);
        assert_eq!(plain(&NaturalKey::new("Article 2"), &NaturalKey::new("Article 2")), Ordering::Equal);
    }

    #[test]
    fn test_collator_compare() {
        let cache = CollatorCache::default();
        let fr = cache.get(Some("fr")).unwrap();
        // Collation places accented letters next to their base letter.
        assert_eq!(
            NaturalKey::new("élan").compare(&NaturalKey::new("zèbre"), &fr),
            Ordering::Less
        );
        assert_eq!(
            NaturalKey::new("Photo-83.jpg").compare(&NaturalKey::new("Photo-138.jpg"), &fr),
            Ordering::Less
        );
    }

    #[test]
    fn test_cache_reuses_and_bounds() {
        let cache = CollatorCache::new(2);
        let a = cache.get(Some("fr")).unwrap();
        let b = cache.get(Some("FR")).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        cache.get(Some("en")).unwrap();
        cache.get(None).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalid_tag_uses_root() {
        let cache = CollatorCache::default();
        assert!(cache.get(Some("not a tag!")).is_ok());
    }

    #[test]
    fn test_label_sorter_groups_by_language() {
        let cache = CollatorCache::default();
        let sorter = LabelSorter::new(&cache, &["fr", "en"]);
        let mut labels = vec![
            LocalizedValue::neutral("zz"),
            LocalizedValue::new("Zebra", Some("en")),
            LocalizedValue::new("Aufruf", Some("de")),
            LocalizedValue::new("Appel 10", Some("fr")),
            LocalizedValue::new("Apple", Some("en")),
            LocalizedValue::new("Appel 9", Some("fr")),
            LocalizedValue::new("Llamada", Some("es")),
        ];
        sorter.sort(&mut labels).unwrap();

        let values: Vec<&str> = labels.iter().map(LocalizedValue::value).collect();
        assert_eq!(
            values,
            vec!["Appel 9", "Appel 10", "Apple", "Zebra", "Aufruf", "Llamada", "zz"]
        );
    }

    #[test]
    fn test_sorted_label_set() {
        let cache = CollatorCache::default();
        let sorter = LabelSorter::new(&cache, &["en", "fr"]);
        let mut set = LocalizedValueSet::default();
        set.add(LocalizedValue::new("Sollicitation", Some("fr")));
        set.add(LocalizedValue::new("Tender 12", Some("en")));
        set.add(LocalizedValue::new("AO", Some("fr")));
        set.add(LocalizedValue::new("Tender 2", Some("en")));

        let values: Vec<String> = sorter
            .sorted(Some(&set))
            .unwrap()
            .iter()
            .map(|v| v.value().to_string())
            .collect();
        assert_eq!(values, vec!["Tender 2", "Tender 12", "AO", "Sollicitation"]);
        assert!(sorter.sorted(None).unwrap().is_empty());
    }

    #[test]
    fn test_sort_by_label() {
        let cache = CollatorCache::default();
        let sorter = LabelSorter::new(&cache, &["fr"]);
        let mut items = vec!["Photo-138.jpg", "photo-2.jpg", "Photo-83.jpg", "Album"];
        sorter.sort_by_label(&mut items, |s| s.to_string()).unwrap();
        assert_eq!(items, vec!["Album", "photo-2.jpg", "Photo-83.jpg", "Photo-138.jpg"]);
    }

    #[test]
    fn test_apply_permutation() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        apply_permutation(&mut items, vec![2, 0, 3, 1]);
        assert_eq!(items, vec!['c', 'a', 'd', 'b']);
    }
}
