//! Name bindings used during evaluation.
//!
//! Sources are supplied by the caller and never change during a pass.
//! Locals are filled in statement order as variable assignments run:
//! ```text
//! limit = this.x * 2
//! z: limit + 1        // sees `limit`
//! ```
//! Both kinds of binding, and the sink results, are kept in a [`Bindings`]
//! map so that iteration follows insertion order.

use core::fmt;

use hashbrown::HashMap;

use crate::diagnostics::Diagnostics;

/// Insertion-ordered map from names to values.
///
/// Rebinding a name replaces its value but keeps its original position.
#[derive(Clone, PartialEq)]
pub struct Bindings<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Bindings<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Binds `name`, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: V) -> Option<V> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => Some(core::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }
}

impl<V> Default for Bindings<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Bindings<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Bindings<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Bindings::new();
        bindings.extend(iter);
        bindings
    }
}

impl<K: Into<String>, V> Extend<(K, V)> for Bindings<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<V> IntoIterator for Bindings<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Sink results in declaration order.
pub type SinkMap<V> = Bindings<V>;

/// Everything one evaluation pass produces.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<V> {
    pub sinks: SinkMap<V>,
    pub diagnostics: Diagnostics,
}

/// Sources borrowed from the caller plus the locals of one evaluation pass.
#[derive(Debug)]
pub struct Environment<'s, V> {
    sources: &'s Bindings<V>,
    locals: Bindings<V>,
}

impl<'s, V> Environment<'s, V> {
    pub fn new(sources: &'s Bindings<V>) -> Self {
        Self {
            sources,
            locals: Bindings::new(),
        }
    }

    pub fn source(&self, name: &str) -> Option<&V> {
        self.sources.get(name)
    }

    pub fn local(&self, name: &str) -> Option<&V> {
        self.locals.get(name)
    }

    /// Last write wins.
    pub fn bind_local(&mut self, name: &str, value: V) {
        self.locals.insert(name, value);
    }

    pub fn locals(&self) -> &Bindings<V> {
        &self.locals
    }
}
