//! This module provides [`Registry`], which owns every registered [`LocaleDictionary`] and a cache
//! of the k-d trees built over their tiers. Registration is additive: registering a locale a second
//! time only fills in tiers it does not have yet, and any such change drops that locale's cached
//! trees so no query ever sees a stale index.
//!
//! A registry is safe to share between threads. Registration and cache fills run under one lock,
//! so a merge and its invalidation are atomic and a tree is never built twice for the same key.
//! Built trees are handed out as `Arc`s and never change.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builtin;
use crate::dictionary::LocaleDictionary;
use crate::kdtree::KdTree;
use crate::tier::Tier;

/// Where a query should get its dictionary from: a locale registered in the registry, or a
/// dictionary passed in directly for a one-off query. Inline dictionaries have no identity to key a
/// cache on, so their trees are rebuilt on every query and never cached.
#[derive(Debug, Copy, Clone)]
pub enum DictionarySource<'a> {
    /// A locale identifier to look up in the registry.
    Registered(&'a str),
    /// A dictionary used as-is, without touching the registry.
    Inline(&'a LocaleDictionary),
}

impl<'a> From<&'a str> for DictionarySource<'a> {
    fn from(locale: &'a str) -> DictionarySource<'a> {
        DictionarySource::Registered(locale)
    }
}

impl<'a> From<&'a String> for DictionarySource<'a> {
    fn from(locale: &'a String) -> DictionarySource<'a> {
        DictionarySource::Registered(locale.as_str())
    }
}

impl<'a> From<&'a LocaleDictionary> for DictionarySource<'a> {
    fn from(dict: &'a LocaleDictionary) -> DictionarySource<'a> {
        DictionarySource::Inline(dict)
    }
}

/// A dictionary a query has resolved. Registered dictionaries are snapshots: a later registration
/// replaces the registry's copy but never changes one already handed out.
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    /// A snapshot of a registered dictionary.
    Registered(Arc<LocaleDictionary>),
    /// A dictionary passed in by the caller.
    Inline(&'a LocaleDictionary),
}

impl<'a> Resolved<'a> {
    /// Returns true if this dictionary came from the registry, and so can use the index cache.
    pub fn is_registered(&self) -> bool {
        match self {
            Resolved::Registered(_) => true,
            Resolved::Inline(_) => false,
        }
    }
}

impl<'a> Deref for Resolved<'a> {
    type Target = LocaleDictionary;

    fn deref(&self) -> &LocaleDictionary {
        match self {
            Resolved::Registered(dict) => dict,
            Resolved::Inline(dict) => dict,
        }
    }
}

#[derive(Debug, Default)]
struct State {
    dictionaries: HashMap<String, Arc<LocaleDictionary>>,
    indexes: HashMap<(String, Tier), Arc<KdTree>>,
}

impl State {
    fn invalidate(&mut self, locale: &str) -> usize {
        let mut dropped = 0;
        for &tier in Tier::ALL.iter() {
            if self.indexes.remove(&(locale.to_string(), tier)).is_some() {
                dropped += 1;
            }
        }
        dropped
    }
}

/// A set of locale dictionaries with a lazily filled cache of their k-d trees.
///
/// # Example
/// ```
/// # use colorlex::registry::Registry;
/// # use colorlex::dictionary::LocaleDictionary;
/// # use colorlex::nameset::ColorNameSet;
/// # use colorlex::tier::Tier;
/// let registry = Registry::new();
/// let basic = ColorNameSet::from_pairs(vec![("black", [0., 0., 0.]), ("white", [1., 0., 0.])]).unwrap();
/// let added = registry.register(LocaleDictionary::new("en", "example").with_tier(Tier::Basic, basic));
/// assert_eq!(added, vec![Tier::Basic]);
/// let dict = registry.resolve("en").unwrap();
/// let tree = registry.index(&dict, Tier::Basic).unwrap();
/// assert_eq!(tree.len(), 2);
/// assert!(registry.is_cached("en", Tier::Basic));
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    state: Mutex<State>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Registry {
        Registry::default()
    }

    /// Creates a registry and registers each dictionary in order, so earlier dictionaries win any
    /// tier they share with later ones for the same locale.
    pub fn with_dictionaries<I: IntoIterator<Item = LocaleDictionary>>(dictionaries: I) -> Registry {
        let registry = Registry::new();
        for dict in dictionaries {
            registry.register(dict);
        }
        registry
    }

    /// Registers a dictionary. A new locale is stored as given. For a locale that is already
    /// registered, only the tiers it is missing are copied in; tiers it has are left alone, as is
    /// its attribution. Returns the tiers that were added. If any were, every cached tree for the
    /// locale is dropped, whichever tier changed, since a search can span several tiers.
    pub fn register(&self, dictionary: LocaleDictionary) -> Vec<Tier> {
        let mut state = self.state.lock();
        let locale = dictionary.locale.clone();
        let added = match state.dictionaries.get_mut(&locale) {
            Some(stored) => {
                let fills_gap = Tier::ALL
                    .iter()
                    .any(|&tier| !stored.has_tier(tier) && dictionary.has_tier(tier));
                if fills_gap {
                    // copy-on-write, so snapshots handed out earlier stay as they were
                    let added = Arc::make_mut(stored).merge_missing(dictionary);
                    tracing::debug!(locale = %locale, tiers = ?added, "merged tiers into dictionary");
                    added
                } else {
                    tracing::warn!(locale = %locale, "registration added no new tiers");
                    vec![]
                }
            }
            None => {
                let added: Vec<Tier> = dictionary.tiers().map(|(tier, _)| tier).collect();
                tracing::debug!(locale = %locale, tiers = ?added, "registered new dictionary");
                state.dictionaries.insert(locale.clone(), Arc::new(dictionary));
                added
            }
        };
        if !added.is_empty() {
            let dropped = state.invalidate(&locale);
            if dropped > 0 {
                tracing::debug!(locale = %locale, dropped, "invalidated cached indexes");
            }
        }
        added
    }

    /// Resolves a dictionary source. A registered locale gives a snapshot of its dictionary, or
    /// `None` if the locale is unknown; an inline dictionary is passed straight through.
    pub fn resolve<'a, S: Into<DictionarySource<'a>>>(&self, source: S) -> Option<Resolved<'a>> {
        match source.into() {
            DictionarySource::Registered(locale) => {
                let found = self.state.lock().dictionaries.get(locale).cloned();
                if found.is_none() {
                    tracing::trace!(locale = %locale, "unknown locale");
                }
                found.map(Resolved::Registered)
            }
            DictionarySource::Inline(dict) => Some(Resolved::Inline(dict)),
        }
    }

    /// Gets the k-d tree for one tier of a resolved dictionary, building it if needed. Returns
    /// `None` if the tier is missing or empty. Trees for registered dictionaries are cached until
    /// the locale is invalidated; a snapshot that has since been superseded by a registration gets
    /// a fresh tree that is not cached.
    pub fn index(&self, dict: &Resolved<'_>, tier: Tier) -> Option<Arc<KdTree>> {
        let snapshot = match dict {
            Resolved::Inline(inline) => {
                let set = inline.tier(tier).filter(|set| !set.is_empty())?;
                return Some(Arc::new(set.build_index()));
            }
            Resolved::Registered(snapshot) => snapshot,
        };
        let mut state = self.state.lock();
        let current = state
            .dictionaries
            .get(&snapshot.locale)
            .map_or(false, |stored| Arc::ptr_eq(stored, snapshot));
        let key = (snapshot.locale.clone(), tier);
        if current {
            if let Some(tree) = state.indexes.get(&key) {
                tracing::trace!(locale = %key.0, tier = %tier, "index cache hit");
                return Some(Arc::clone(tree));
            }
        }
        let set = snapshot.tier(tier).filter(|set| !set.is_empty())?;
        let tree = Arc::new(set.build_index());
        tracing::trace!(locale = %key.0, tier = %tier, points = tree.len(), "built index");
        if current {
            state.indexes.insert(key, Arc::clone(&tree));
        }
        Some(tree)
    }

    /// Drops every cached tree for a locale. Returns how many were dropped.
    pub fn invalidate(&self, locale: &str) -> usize {
        self.state.lock().invalidate(locale)
    }

    /// Returns true if a tree for this locale and tier is currently cached.
    pub fn is_cached(&self, locale: &str, tier: Tier) -> bool {
        self.state.lock().indexes.contains_key(&(locale.to_string(), tier))
    }

    /// Returns true if the locale is registered.
    pub fn contains(&self, locale: &str) -> bool {
        self.state.lock().dictionaries.contains_key(locale)
    }

    /// Gets a snapshot of a registered dictionary.
    pub fn dictionary(&self, locale: &str) -> Option<Arc<LocaleDictionary>> {
        self.state.lock().dictionaries.get(locale).cloned()
    }

    /// Lists the registered locales, sorted.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.state.lock().dictionaries.keys().cloned().collect();
        locales.sort();
        locales
    }
}

lazy_static! {
    static ref DEFAULT_REGISTRY: Registry = Registry::with_dictionaries(vec![builtin::english()]);
}

/// A process-wide registry, created on first use and seeded with the built-in English dictionary
/// under [`ENGLISH_LOCALE`](crate::builtin::ENGLISH_LOCALE). Anything registered here is visible to
/// every other user of the default registry.
pub fn default_registry() -> &'static Registry {
    &DEFAULT_REGISTRY
}
