//! NormalizingMap: an insertion-ordered map whose keys and values pass through
//! construction-time hooks on every write and lookup.
//!
//! `set` runs the key hook, then the value hook, and only then touches the
//! entry list; if either hook fails nothing changes. `get`, `has` and
//! `delete` run only the key hook. Iteration never runs a hook: it shows the
//! stored, already-normalized data.

use crate::coerce::Hook;
use crate::entry_list::{self, EntryList};
use crate::error::{CoercionError, ConstructionError, ExtendError};
use crate::options::MapOptions;
use crate::same_value_zero::SameValueZero;
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// Map from normalized `K` to normalized `V`, fed with raw `RK`/`RV`.
pub struct NormalizingMap<K, V, RK = K, RV = V, S = RandomState> {
    entries: EntryList<K, V, S>,
    coerce_key: Hook<RK, K>,
    coerce_value: Hook<RV, V>,
}

impl<K, V> NormalizingMap<K, V>
where
    K: SameValueZero,
{
    /// Map with identity hooks.
    pub fn new() -> Self {
        Self::with_options(MapOptions::new())
    }
}

impl<K, V> Default for NormalizingMap<K, V>
where
    K: SameValueZero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, RK, RV> NormalizingMap<K, V, RK, RV>
where
    K: SameValueZero,
{
    pub fn with_options(options: MapOptions<K, V, RK, RV>) -> Self {
        Self::with_options_and_hasher(options, RandomState::new())
    }

    /// Build a map by passing each `(key, value)` through `set`, in order.
    /// Later pairs overwrite earlier ones with an equivalent normalized key.
    pub fn from_entries<I>(
        entries: I,
        options: MapOptions<K, V, RK, RV>,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = (RK, RV)>,
    {
        Self::from_entries_with_hasher(entries, options, RandomState::new())
    }
}

impl<K, V, RK, RV, S> NormalizingMap<K, V, RK, RV, S>
where
    K: SameValueZero,
    S: BuildHasher,
{
    pub fn with_options_and_hasher(options: MapOptions<K, V, RK, RV>, hasher: S) -> Self {
        let MapOptions {
            coerce_key,
            coerce_value,
        } = options;
        Self {
            entries: EntryList::with_hasher(hasher),
            coerce_key,
            coerce_value,
        }
    }

    pub fn from_entries_with_hasher<I>(
        entries: I,
        options: MapOptions<K, V, RK, RV>,
        hasher: S,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = (RK, RV)>,
    {
        let mut map = Self::with_options_and_hasher(options, hasher);
        let mut consumed = 0usize;
        for (index, (key, value)) in entries.into_iter().enumerate() {
            map.set(key, value)
                .map_err(|source| ConstructionError { index, source })?;
            consumed += 1;
        }
        tracing::trace!(
            consumed,
            size = map.size(),
            "built normalizing map from initial entries"
        );
        Ok(map)
    }

    fn normalize_key(&self, key: RK) -> Result<K, CoercionError> {
        self.coerce_key.apply(key).map_err(CoercionError::Key)
    }

    /// Store `value` under `key`, both normalized. An existing entry with an
    /// equivalent key keeps its position and gets the new value.
    pub fn set(&mut self, key: RK, value: RV) -> Result<&mut Self, CoercionError> {
        let key = self.normalize_key(key)?;
        let value = self
            .coerce_value
            .apply(value)
            .map_err(CoercionError::Value)?;
        self.entries.upsert(key, value);
        Ok(self)
    }

    /// The stored value for the normalized `key`, or `None` if absent.
    pub fn get(&self, key: RK) -> Result<Option<&V>, CoercionError> {
        let key = self.normalize_key(key)?;
        Ok(self.entries.get(&key))
    }

    pub fn has(&self, key: RK) -> Result<bool, CoercionError> {
        let key = self.normalize_key(key)?;
        Ok(self.entries.contains(&key))
    }

    /// Remove the entry for the normalized `key`. Returns whether one existed.
    pub fn delete(&mut self, key: RK) -> Result<bool, CoercionError> {
        let key = self.normalize_key(key)?;
        Ok(self.entries.remove(&key).is_some())
    }

    /// Pass each pair through `set`. Stops at the first rejected pair; pairs
    /// before it stay in the map.
    pub fn try_extend<I>(&mut self, entries: I) -> Result<(), ExtendError>
    where
        I: IntoIterator<Item = (RK, RV)>,
    {
        for (index, (key, value)) in entries.into_iter().enumerate() {
            self.set(key, value)
                .map_err(|source| ExtendError { index, source })?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        let dropped = self.entries.clear();
        tracing::trace!(dropped, "cleared normalizing map");
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored `(key, value)` pairs in insertion order.
    pub fn entries(&self) -> Entries<'_, K, V> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.entries.iter(),
        }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.entries.iter(),
        }
    }

    pub fn iter(&self) -> Entries<'_, K, V> {
        self.entries()
    }
}

impl<'a, K, V, RK, RV, S> IntoIterator for &'a NormalizingMap<K, V, RK, RV, S>
where
    K: SameValueZero,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Entries<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries()
    }
}

impl<K, V, RK, RV, S> fmt::Debug for NormalizingMap<K, V, RK, RV, S>
where
    K: SameValueZero + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

/// Iterator over stored `(key, value)` pairs, see [`NormalizingMap::entries`].
pub struct Entries<'a, K, V> {
    inner: entry_list::Iter<'a, K, V>,
}

/// Iterator over stored keys, see [`NormalizingMap::keys`].
pub struct Keys<'a, K, V> {
    inner: entry_list::Iter<'a, K, V>,
}

/// Iterator over stored values, see [`NormalizingMap::values`].
pub struct Values<'a, K, V> {
    inner: entry_list::Iter<'a, K, V>,
}

macro_rules! map_iter {
    ($name:ident, $item:ty, |$k:ident, $v:ident| $out:expr) => {
        impl<K, V> Clone for $name<'_, K, V> {
            fn clone(&self) -> Self {
                Self {
                    inner: self.inner.clone(),
                }
            }
        }

        impl<'a, K, V> Iterator for $name<'a, K, V> {
            type Item = $item;

            #[inline]
            fn next(&mut self) -> Option<Self::Item> {
                self.inner.next().map(|($k, $v)| $out)
            }

            #[inline]
            fn size_hint(&self) -> (usize, Option<usize>) {
                self.inner.size_hint()
            }
        }

        impl<K, V> DoubleEndedIterator for $name<'_, K, V> {
            #[inline]
            fn next_back(&mut self) -> Option<Self::Item> {
                self.inner.next_back().map(|($k, $v)| $out)
            }
        }

        impl<K, V> ExactSizeIterator for $name<'_, K, V> {}
        impl<K, V> FusedIterator for $name<'_, K, V> {}
    };
}

map_iter!(Entries, (&'a K, &'a V), |k, v| (k, v));
map_iter!(Keys, &'a K, |k, _v| k);
map_iter!(Values, &'a V, |_k, v| v);
