//! Multiset keyed by occurrence count.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::collections::hash_map;
use std::hash::Hash;

/// Counts how many times each key was inserted.
///
/// A key is present only while its count is above zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashBag<K: Eq + Hash> {
    counts: HashMap<K, u32>,
}

impl<K: Eq + Hash> Default for HashBag<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> HashBag<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the count for `key`, returning the new count.
    pub fn insert(&mut self, key: K) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// Decrements the count for `key`, returning the remaining count.
    ///
    /// The key is dropped once its count reaches zero. Removing an absent
    /// key is a no-op that returns 0.
    pub fn remove<Q>(&mut self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        let Some(count) = self.counts.get_mut(key) else {
            return 0;
        };
        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            self.counts.remove(key);
        }
        remaining
    }

    pub fn count<Q>(&self, key: &Q) -> u32
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.counts.contains_key(key)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, u32> {
        self.counts.iter()
    }
}

impl<K: Eq + Hash> Extend<K> for HashBag<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Eq + Hash> FromIterator<K> for HashBag<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}
