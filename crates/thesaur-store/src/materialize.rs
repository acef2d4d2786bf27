//! Graph materialization: RDF statements into typed entities.
//!
//! A single pass groups statements by subject and feeds each one into the
//! entity built for that subject. Literal objects become localized
//! properties, IRI and blank-node objects become associations. The pass does
//! not depend on statement order.
//!
//! Blank-node keys embed a pass number, so `_:b0` from two passes yields two
//! distinct keys.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use thesaur_core::{
    is_blank_key, logging, Error, Materializable, Result, Statement, Term, BLANK_NODE_PREFIX,
};
use tracing::{debug, trace};

static NEXT_PASS: AtomicU64 = AtomicU64::new(1);

/// Keys of one materialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlankScope {
    pass: u64,
}

impl BlankScope {
    /// A scope no other pass shares.
    pub fn new() -> Self {
        Self {
            pass: NEXT_PASS.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Key for a store blank-node id inside this pass.
    pub fn blank_key(&self, id: &str) -> String {
        format!("{}{}:{}", BLANK_NODE_PREFIX, self.pass, id)
    }

    /// Key for a subject or object term, `None` for literals.
    pub fn term_key(&self, term: &Term) -> Option<String> {
        match term {
            Term::Iri(iri) => Some(iri.clone()),
            Term::BlankNode(id) => Some(self.blank_key(id)),
            Term::Literal { .. } => None,
        }
    }
}

impl Default for BlankScope {
    fn default() -> Self {
        Self::new()
    }
}

/// How statements are applied to entities already holding values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterializeMode {
    /// Values accumulate per predicate.
    #[default]
    Accumulate,
    /// Each (subject, predicate) pair is cleared the first time it is seen in
    /// the pass, then accumulates.
    ResetPredicates,
}

/// Entities built by one materialization pass.
///
/// Keys are subject URIs, or `_bnode:<pass>:<id>` for blank-node subjects.
/// Blank keys are only meaningful inside this value.
#[derive(Debug, Clone)]
pub struct Materialization<T> {
    scope: BlankScope,
    index: HashMap<String, usize>,
    items: Vec<T>,
}

impl<T> Default for Materialization<T> {
    fn default() -> Self {
        Self {
            scope: BlankScope::new(),
            index: HashMap::new(),
            items: Vec::new(),
        }
    }
}

impl<T: Materializable> Materialization<T> {
    /// Key this pass gave to the store blank node `id`.
    pub fn blank_key(&self, id: &str) -> String {
        self.scope.blank_key(id)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index.get(key).map(|&i| &self.items[i])
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.items[i]),
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entities in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Entities with a real URI, in first-seen order.
    pub fn named(&self) -> impl Iterator<Item = &T> {
        self.items
            .iter()
            .filter(|item| !is_blank_key(item.resource().uri()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.resource().uri())
    }

    /// Entities in first-seen order.
    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    /// Entities with a real URI, in first-seen order.
    ///
    /// Associations to blank nodes are dropped, as their keys mean nothing
    /// once the pass is gone.
    pub fn into_named(self) -> Vec<T> {
        self.items
            .into_iter()
            .filter(|item| !is_blank_key(item.resource().uri()))
            .map(|mut item| {
                item.resource_mut().drop_blank_associations();
                item
            })
            .collect()
    }

    /// Key to entity, sorted by key.
    pub fn into_map(self) -> BTreeMap<String, T> {
        self.items
            .into_iter()
            .map(|item| (item.resource().uri().to_string(), item))
            .collect()
    }

    fn entry_with<F>(&mut self, key: &str, factory: &mut F) -> &mut T
    where
        F: FnMut(&str) -> T,
    {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.items.len();
                self.items.push(factory(key));
                self.index.insert(key.to_string(), i);
                i
            }
        };
        &mut self.items[i]
    }
}

/// Materialize statements into entities created by `T::from_uri`.
pub fn materialize<T, I>(statements: I, mode: MaterializeMode) -> Materialization<T>
where
    T: Materializable,
    I: IntoIterator<Item = Statement>,
{
    materialize_with(statements, mode, T::from_uri)
}

/// Materialize statements with a caller-supplied factory for new subjects.
pub fn materialize_with<T, I, F>(statements: I, mode: MaterializeMode, mut factory: F) -> Materialization<T>
where
    T: Materializable,
    I: IntoIterator<Item = Statement>,
    F: FnMut(&str) -> T,
{
    let start = Instant::now();
    let mut result = Materialization::default();
    let scope = result.scope;
    let mut reset_seen: HashSet<(String, String)> = HashSet::new();
    let mut statement_count = 0usize;

    for statement in statements {
        statement_count += 1;
        let Some(key) = scope.term_key(&statement.subject) else {
            trace!(subject = %statement.subject, "Skipping statement with literal subject");
            continue;
        };

        if mode == MaterializeMode::ResetPredicates
            && reset_seen.insert((key.clone(), statement.predicate.clone()))
        {
            let resource = result.entry_with(&key, &mut factory).resource_mut();
            resource.reset_property(&statement.predicate);
            resource.reset_association(&statement.predicate);
        }

        let entity = result.entry_with(&key, &mut factory);
        apply_object(entity, &statement.predicate, scope.term_key(&statement.object), &statement.object);
    }

    debug!(
        { logging::SUBSYSTEM } = "store",
        { logging::COMPONENT } = "materializer",
        { logging::OPERATION } = "materialize",
        { logging::STATEMENT_COUNT } = statement_count,
        { logging::ENTITY_COUNT } = result.len(),
        { logging::DURATION_MS } = start.elapsed().as_millis() as u64,
        "Materialization complete"
    );
    result
}

/// Materialize statements expected to describe at most one named subject.
///
/// Blank-node subjects are ignored when counting. More than one named
/// subject is an [`Error::AmbiguousResult`]; none yields `Ok(None)`.
pub fn materialize_single<T, I>(statements: I) -> Result<Option<T>>
where
    T: Materializable,
    I: IntoIterator<Item = Statement>,
{
    let mut named = materialize::<T, _>(statements, MaterializeMode::Accumulate).into_named();
    match named.len() {
        0 => Ok(None),
        1 => Ok(named.pop()),
        found => Err(Error::AmbiguousResult {
            found,
            subjects: named
                .iter()
                .map(|item| item.resource().uri())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Replace the predicates carried by `statements` on an existing entity.
///
/// Each predicate present in the statements is cleared once, then refilled.
/// Statements about other subjects are skipped. The statements form a pass of
/// their own: blank subjects never match the target and blank objects are
/// not linked. Returns the number of statements applied.
pub fn refresh_into<T, I>(target: &mut T, statements: I) -> usize
where
    T: Materializable,
    I: IntoIterator<Item = Statement>,
{
    let scope = BlankScope::new();
    let target_uri = target.resource().uri().to_string();
    let mut reset_seen: HashSet<String> = HashSet::new();
    let mut applied = 0usize;

    for statement in statements {
        if scope.term_key(&statement.subject).as_deref() != Some(target_uri.as_str()) {
            trace!(subject = %statement.subject, uri = %target_uri, "Skipping statement for other subject");
            continue;
        }
        if reset_seen.insert(statement.predicate.clone()) {
            let resource = target.resource_mut();
            resource.reset_property(&statement.predicate);
            resource.reset_association(&statement.predicate);
        }
        let object_key = match &statement.object {
            Term::BlankNode(_) => None,
            object => scope.term_key(object),
        };
        apply_object(target, &statement.predicate, object_key, &statement.object);
        applied += 1;
    }

    debug!(
        { logging::SUBSYSTEM } = "store",
        { logging::COMPONENT } = "materializer",
        { logging::OPERATION } = "refresh",
        { logging::URI } = %target_uri,
        { logging::STATEMENT_COUNT } = applied,
        predicate_count = reset_seen.len(),
        "Refresh complete"
    );
    applied
}

fn apply_object<T: Materializable>(
    entity: &mut T,
    predicate: &str,
    object_key: Option<String>,
    object: &Term,
) {
    let resource = entity.resource_mut();
    match object {
        Term::Literal {
            value, language, ..
        } => resource.add_property(predicate, value, language.as_deref()),
        _ => {
            if let Some(target) = object_key {
                resource.add_association(predicate, &target);
            }
        }
    }
}
