//! NormalizingSet: an insertion-ordered set whose members pass through a
//! construction-time hook on every write and lookup.

use crate::coerce::Hook;
use crate::entry_list::{self, EntryList};
use crate::error::{CoercionError, ConstructionError, ExtendError};
use crate::options::SetOptions;
use crate::same_value_zero::SameValueZero;
use core::fmt;
use core::hash::BuildHasher;
use core::iter::FusedIterator;
use std::collections::hash_map::RandomState;

/// Set of normalized `T`, fed with raw `R`.
pub struct NormalizingSet<T, R = T, S = RandomState> {
    entries: EntryList<T, (), S>,
    coerce_value: Hook<R, T>,
}

impl<T> NormalizingSet<T>
where
    T: SameValueZero,
{
    pub fn new() -> Self {
        Self::with_options(SetOptions::new())
    }
}

impl<T> Default for NormalizingSet<T>
where
    T: SameValueZero,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> NormalizingSet<T, R>
where
    T: SameValueZero,
{
    pub fn with_options(options: SetOptions<T, R>) -> Self {
        Self::with_options_and_hasher(options, RandomState::new())
    }

    /// Build a set by passing each value through `add`, in order.
    pub fn from_values<I>(values: I, options: SetOptions<T, R>) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = R>,
    {
        Self::from_values_with_hasher(values, options, RandomState::new())
    }
}

impl<T, R, S> NormalizingSet<T, R, S>
where
    T: SameValueZero,
    S: BuildHasher,
{
    pub fn with_options_and_hasher(options: SetOptions<T, R>, hasher: S) -> Self {
        Self {
            entries: EntryList::with_hasher(hasher),
            coerce_value: options.coerce_value,
        }
    }

    pub fn from_values_with_hasher<I>(
        values: I,
        options: SetOptions<T, R>,
        hasher: S,
    ) -> Result<Self, ConstructionError>
    where
        I: IntoIterator<Item = R>,
    {
        let mut set = Self::with_options_and_hasher(options, hasher);
        let mut consumed = 0usize;
        for (index, value) in values.into_iter().enumerate() {
            set.add(value)
                .map_err(|source| ConstructionError { index, source })?;
            consumed += 1;
        }
        tracing::trace!(
            consumed,
            size = set.size(),
            "built normalizing set from initial values"
        );
        Ok(set)
    }

    fn normalize(&self, value: R) -> Result<T, CoercionError> {
        self.coerce_value.apply(value).map_err(CoercionError::Value)
    }

    /// Add the normalized `value` unless an equivalent member exists.
    pub fn add(&mut self, value: R) -> Result<&mut Self, CoercionError> {
        let value = self.normalize(value)?;
        self.entries.insert_absent(value, ());
        Ok(self)
    }

    pub fn has(&self, value: R) -> Result<bool, CoercionError> {
        let value = self.normalize(value)?;
        Ok(self.entries.contains(&value))
    }

    /// Remove the member equivalent to the normalized `value`. Returns whether
    /// one existed.
    pub fn delete(&mut self, value: R) -> Result<bool, CoercionError> {
        let value = self.normalize(value)?;
        Ok(self.entries.remove(&value).is_some())
    }

    /// Pass each value through `add`. Stops at the first rejected value;
    /// values before it stay in the set.
    pub fn try_extend<I>(&mut self, values: I) -> Result<(), ExtendError>
    where
        I: IntoIterator<Item = R>,
    {
        for (index, value) in values.into_iter().enumerate() {
            self.add(value)
                .map_err(|source| ExtendError { index, source })?;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        let dropped = self.entries.clear();
        tracing::trace!(dropped, "cleared normalizing set");
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored members in insertion order.
    pub fn values(&self) -> Iter<'_, T> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.values()
    }
}

impl<'a, T, R, S> IntoIterator for &'a NormalizingSet<T, R, S>
where
    T: SameValueZero,
    S: BuildHasher,
{
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values()
    }
}

impl<T, R, S> fmt::Debug for NormalizingSet<T, R, S>
where
    T: SameValueZero + fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values()).finish()
    }
}

/// Iterator over stored members, see [`NormalizingSet::values`].
pub struct Iter<'a, T> {
    inner: entry_list::Iter<'a, T, ()>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(v, _)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(v, _)| v)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use std::rc::Rc;
    use tracing_test::traced_test;

    /// Invariant: adding an equivalent value is a no-op; the first stored
    /// form is kept.
    #[test]
    fn add_is_idempotent_and_keeps_first_form() {
        let mut s = NormalizingSet::new();
        s.add(0.0f64).unwrap().add(-0.0).unwrap().add(f64::NAN).unwrap();
        s.add(f64::NAN).unwrap();
        assert_eq!(s.size(), 2);
        let first = *s.values().next().unwrap();
        assert!(first == 0.0 && first.is_sign_positive());
        assert!(s.has(-0.0).unwrap());
        assert!(s.has(f64::NAN).unwrap());
    }

    /// Invariant: a failing hook leaves the set unchanged and surfaces as a
    /// value coercion error.
    #[test]
    fn rejected_value_is_not_added() {
        let opts = SetOptions::new().coerce_value(|s: &'static str| s.trim().parse::<u16>());
        let mut s: NormalizingSet<u16, &'static str> = NormalizingSet::with_options(opts);
        s.add(" 8080 ").unwrap();
        let err = s.add("http").unwrap_err();
        assert!(err.is_value());
        assert_eq!(s.size(), 1);
        assert!(s.has("8080").unwrap());
        assert!(s.has("x").is_err());
    }

    #[test]
    fn values_never_run_the_hook() {
        let calls = Rc::new(Cell::new(0usize));
        let c = calls.clone();
        let opts = SetOptions::new().map_value(move |s: &'static str| {
            c.set(c.get() + 1);
            s.to_ascii_lowercase()
        });
        let s: NormalizingSet<String, &'static str> =
            NormalizingSet::from_values(["A", "b", "a"], opts).unwrap();
        assert_eq!(calls.get(), 3);
        let got: Vec<_> = s.values().map(String::as_str).collect();
        assert_eq!(got, ["a", "b"]);
        assert_eq!(format!("{s:?}"), r#"{"a", "b"}"#);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    #[traced_test]
    fn construction_is_traced() {
        let s: NormalizingSet<i32> =
            NormalizingSet::from_values([1, 2, 2], SetOptions::new()).unwrap();
        assert_eq!(s.size(), 2);
        assert!(logs_contain("built normalizing set from initial values"));
        assert!(logs_contain("consumed=3"));
    }
}
