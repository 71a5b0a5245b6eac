// Copyright 2025 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::collections::btree_map;
use alloc::string::String;
use core::borrow::Borrow;
use core::fmt::{self, Debug, Display};

/// The name of an attribute.
///
/// Keys are compared by their string value. Well-known keys can be declared as constants with
/// [`AttributeKey::from_static`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeKey(Cow<'static, str>);

impl AttributeKey {
    /// Creates a key from a string with static lifetime, usable in `const` items.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Creates a key from any string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The key's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AttributeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AttributeKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for AttributeKey {
    fn from(value: &'static str) -> Self {
        Self::from_static(value)
    }
}

impl From<String> for AttributeKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

/// An ordered map from [`AttributeKey`] to attribute values.
///
/// Iteration order is the order of the keys.
#[derive(Clone, PartialEq)]
pub struct Attributes<V> {
    map: BTreeMap<AttributeKey, V>,
}

impl<V> Default for Attributes<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Debug> Debug for Attributes<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.map.iter()).finish()
    }
}

impl<V> Attributes<V> {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Returns the number of attributes.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if there are no attributes.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.map.get(key)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Inserts a value, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<AttributeKey>, value: V) -> Option<V> {
        self.map.insert(key.into(), value)
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, key: impl Into<AttributeKey>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.map.remove(key)
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, AttributeKey, V> {
        self.map.iter()
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, AttributeKey, V> {
        self.map.keys()
    }
}

impl<V: Clone> Attributes<V> {
    /// Copies every attribute of `other` into `self`, overwriting existing values.
    pub fn extend_from(&mut self, other: &Self) {
        for (key, value) in other {
            self.map.insert(key.clone(), value.clone());
        }
    }
}

impl<V> FromIterator<(AttributeKey, V)> for Attributes<V> {
    fn from_iter<I: IntoIterator<Item = (AttributeKey, V)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl<V> Extend<(AttributeKey, V)> for Attributes<V> {
    fn extend<I: IntoIterator<Item = (AttributeKey, V)>>(&mut self, iter: I) {
        self.map.extend(iter);
    }
}

impl<'a, V> IntoIterator for &'a Attributes<V> {
    type Item = (&'a AttributeKey, &'a V);
    type IntoIter = btree_map::Iter<'a, AttributeKey, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}
