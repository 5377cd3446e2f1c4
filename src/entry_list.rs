//! EntryList: insertion-ordered storage shared by the map and the set.
//!
//! Entries live in a `SlotMap` and are threaded into a doubly linked list in
//! insertion order. A `HashTable` of slot keys indexes them by their
//! SameValueZero hash. Each entry keeps its precomputed hash, so growing the
//! table never calls back into `SameValueZero::hash_value_zero`.
//!
//! The list never runs coercion hooks; it only sees values that are already
//! normalized. The only user code it invokes is `SameValueZero`, inside the
//! debug reentrancy guard.

use crate::reentrancy::DebugReentrancy;
use crate::same_value_zero::SameValueZero;
use core::hash::{BuildHasher, Hasher};
use core::iter::FusedIterator;
use hashbrown::hash_table::Entry as TableEntry;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
    prev: Option<DefaultKey>,
    next: Option<DefaultKey>,
}

/// Outcome of a write into the list.
enum Upsert<V> {
    Inserted,
    /// An equivalent key was present; its value was swapped in place.
    Replaced(V),
    /// An equivalent key was present and left untouched.
    Present,
}

pub(crate) struct EntryList<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    reentrancy: DebugReentrancy,
}

impl<K, V> EntryList<K, V>
where
    K: SameValueZero,
{
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }
}

impl<K, V, S> EntryList<K, V, S>
where
    K: SameValueZero,
    S: BuildHasher,
{
    pub(crate) fn with_hasher(hasher: S) -> Self {
        Self {
            hasher,
            index: HashTable::new(),
            slots: SlotMap::with_key(),
            head: None,
            tail: None,
            reentrancy: DebugReentrancy::new(),
        }
    }

    fn make_hash(&self, key: &K) -> u64 {
        let mut state = self.hasher.build_hasher();
        key.hash_value_zero(&mut state);
        state.finish()
    }

    fn probe(&self, hash: u64, key: &K) -> Option<DefaultKey> {
        self.index
            .find(hash, |&k| {
                self.slots
                    .get(k)
                    .is_some_and(|e| e.key.same_value_zero(key))
            })
            .copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        let _g = self.reentrancy.enter("contains");
        let hash = self.make_hash(key);
        self.probe(hash, key).is_some()
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        let _g = self.reentrancy.enter("get");
        let hash = self.make_hash(key);
        let k = self.probe(hash, key)?;
        self.slots.get(k).map(|e| &e.value)
    }

    /// Replace the value of an equivalent entry in place, or append a new one.
    /// The stored key of an existing entry is kept. Returns the replaced value.
    pub(crate) fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.write("upsert", key, value, true) {
            Upsert::Replaced(old) => Some(old),
            Upsert::Inserted | Upsert::Present => None,
        }
    }

    /// Append `key` unless an equivalent entry exists. Returns true if appended.
    pub(crate) fn insert_absent(&mut self, key: K, value: V) -> bool {
        matches!(
            self.write("insert_absent", key, value, false),
            Upsert::Inserted
        )
    }

    fn write(&mut self, op: &'static str, key: K, value: V, overwrite: bool) -> Upsert<V> {
        let _g = self.reentrancy.enter(op);
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| {
                self.slots
                    .get(kk)
                    .is_some_and(|e| e.key.same_value_zero(&key))
            },
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            TableEntry::Occupied(_) if !overwrite => Upsert::Present,
            TableEntry::Occupied(o) => {
                let k = *o.get();
                match self.slots.get_mut(k) {
                    Some(e) => Upsert::Replaced(core::mem::replace(&mut e.value, value)),
                    // Index and slots are kept in lockstep.
                    None => unreachable!("index refers to a vacant slot"),
                }
            }
            TableEntry::Vacant(v) => {
                let k = self.slots.insert(Entry {
                    key,
                    value,
                    hash,
                    prev: self.tail,
                    next: None,
                });
                v.insert(k);
                match self.tail.and_then(|t| self.slots.get_mut(t)) {
                    Some(last) => last.next = Some(k),
                    None => self.head = Some(k),
                }
                self.tail = Some(k);
                Upsert::Inserted
            }
        }
    }

    /// Unlink and return the entry equivalent to `key`. Other entries keep
    /// their relative order.
    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let _g = self.reentrancy.enter("remove");
        let hash = self.make_hash(key);
        let slots = &self.slots;
        let occupied = self
            .index
            .find_entry(hash, |&k| {
                slots.get(k).is_some_and(|e| e.key.same_value_zero(key))
            })
            .ok()?;
        let (k, _) = occupied.remove();
        let entry = self.slots.remove(k)?;
        // Field-wise so the guard stays held across the relink.
        match entry.prev.and_then(|p| self.slots.get_mut(p)) {
            Some(e) => e.next = entry.next,
            None => self.head = entry.next,
        }
        match entry.next.and_then(|n| self.slots.get_mut(n)) {
            Some(e) => e.prev = entry.prev,
            None => self.tail = entry.prev,
        }
        Some((entry.key, entry.value))
    }

    /// Drop every entry. Returns how many were removed.
    pub(crate) fn clear(&mut self) -> usize {
        let _g = self.reentrancy.enter("clear");
        let n = self.slots.len();
        self.index.clear();
        self.slots.clear();
        self.head = None;
        self.tail = None;
        n
    }

    pub(crate) fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            front: self.head,
            back: self.tail,
            remaining: self.slots.len(),
        }
    }
}

/// Entries in insertion order. Cloning restarts from the clone's position.
pub(crate) struct Iter<'a, K, V> {
    slots: &'a SlotMap<DefaultKey, Entry<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.slots.get(self.front?)?;
        self.front = e.next;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.slots.get(self.back?)?;
        self.back = e.prev;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}
