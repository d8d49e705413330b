//! Keyed tree store
//!
//! Provides [`TreeStore`], the host-owned mapping from a module or
//! sub-folder key to the current snapshot of its tree.
//!
//! The store never merges: [`TreeStore::set`] replaces the whole sequence
//! for a key. Every replacement stamps the key with a fresh [`Revision`] and
//! notifies the registered [`TreeObserver`]s, so anything holding derived
//! state (a navigator path, a rendered listing) knows it has to re-derive.

use crate::error::StoreError;
use crate::seed::SeedDocument;
use dms_tree::Forest;
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};

/// Store-wide write counter
///
/// Seeded trees start at zero. Every [`TreeStore::set`] and every key
/// created by [`TreeStore::insert_empty`] takes the next value of one
/// counter shared by all keys, so a key that is removed and created again
/// never repeats a revision it had before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Revision(u64);

impl Revision {
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    #[must_use]
    const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Snapshot of one key at one revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Tree contents (cheap to clone)
    pub forest: Forest,
    /// Revision the contents belong to
    pub revision: Revision,
}

/// Receives every replacement made through [`TreeStore::set`]
///
/// This is the host's `onTreeChange` hook: persist, broadcast or log.
pub trait TreeObserver {
    /// Called after `key` was replaced by `forest`
    fn tree_changed(&mut self, key: &str, forest: &Forest, revision: Revision);
}

impl<F> TreeObserver for F
where
    F: FnMut(&str, &Forest, Revision),
{
    fn tree_changed(&mut self, key: &str, forest: &Forest, revision: Revision) {
        self(key, forest, revision);
    }
}

#[derive(Debug, Clone)]
struct Entry {
    forest: Forest,
    revision: Revision,
}

/// Mapping from view key to document tree
///
/// Keys keep insertion order so listings and exports are stable.
#[derive(Default)]
pub struct TreeStore {
    trees: IndexMap<String, Entry>,
    latest: Revision,
    observers: Vec<Box<dyn TreeObserver>>,
}

impl TreeStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store populated from a seed document
    #[must_use]
    pub fn from_seed(seed: &SeedDocument) -> Self {
        seed.trees
            .iter()
            .map(|(key, forest)| (key.clone(), forest.clone()))
            .collect()
    }

    /// Register an observer for all future writes
    pub fn subscribe(&mut self, observer: Box<dyn TreeObserver>) {
        self.observers.push(observer);
    }

    /// Current tree for `key`; empty if the key is unknown
    #[must_use]
    pub fn get(&self, key: &str) -> Forest {
        self.trees
            .get(key)
            .map(|entry| entry.forest.clone())
            .unwrap_or_default()
    }

    /// Current tree for `key`
    ///
    /// # Errors
    /// Returns error if no tree is registered under `key`
    pub fn require(&self, key: &str) -> Result<Forest, StoreError> {
        self.trees
            .get(key)
            .map(|entry| entry.forest.clone())
            .ok_or_else(|| StoreError::UnknownKey(key.to_string()))
    }

    /// Tree and revision for `key`
    #[must_use]
    pub fn snapshot(&self, key: &str) -> Option<Snapshot> {
        self.trees.get(key).map(|entry| Snapshot {
            forest: entry.forest.clone(),
            revision: entry.revision,
        })
    }

    #[inline]
    #[must_use]
    pub fn revision(&self, key: &str) -> Option<Revision> {
        self.trees.get(key).map(|entry| entry.revision)
    }

    /// Replace the whole tree for `key` and notify observers
    ///
    /// Unknown keys are created. Returns the new revision.
    pub fn set(&mut self, key: &str, forest: Forest) -> Revision {
        let revision = self.bump();
        self.trees.insert(key.to_string(), Entry { forest, revision });

        tracing::debug!(key, revision = revision.value(), "tree replaced");

        if let Some(entry) = self.trees.get(key) {
            for observer in &mut self.observers {
                observer.tree_changed(key, &entry.forest, revision);
            }
        }
        revision
    }

    /// Register an empty tree for `key` unless one exists
    ///
    /// Returns `true` if the key was created.
    pub fn insert_empty(&mut self, key: &str) -> bool {
        if self.trees.contains_key(key) {
            return false;
        }
        let revision = self.bump();
        self.trees.insert(
            key.to_string(),
            Entry {
                forest: Forest::new(),
                revision,
            },
        );
        true
    }

    /// Latest revision handed out by this store
    #[inline]
    #[must_use]
    pub fn latest_revision(&self) -> Revision {
        self.latest
    }

    fn bump(&mut self) -> Revision {
        self.latest = self.latest.next();
        self.latest
    }

    /// Drop the tree for `key`
    pub fn remove(&mut self, key: &str) -> Option<Forest> {
        self.trees.shift_remove(key).map(|entry| entry.forest)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.trees.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Copy of every tree, for writing a seed back out
    #[must_use]
    pub fn export(&self) -> IndexMap<String, Forest> {
        self.trees
            .iter()
            .map(|(key, entry)| (key.clone(), entry.forest.clone()))
            .collect()
    }
}

impl FromIterator<(String, Forest)> for TreeStore {
    fn from_iter<I: IntoIterator<Item = (String, Forest)>>(iter: I) -> Self {
        let trees = iter
            .into_iter()
            .map(|(key, forest)| {
                (
                    key,
                    Entry {
                        forest,
                        revision: Revision::default(),
                    },
                )
            })
            .collect();
        Self {
            trees,
            latest: Revision::default(),
            observers: Vec::new(),
        }
    }
}

impl Debug for TreeStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeStore")
            .field("keys", &self.trees.keys().collect::<Vec<_>>())
            .field("latest", &self.latest)
            .field("observers", &self.observers.len())
            .finish()
    }
}
