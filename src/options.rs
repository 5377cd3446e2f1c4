//! Construction-time configuration for the collections.
//!
//! `new()` installs identity hooks. Installing a hook fixes the raw input
//! type of that side while the normalized type stays the one the collection
//! stores:
//!
//! ```
//! use normalizing_collections::{MapOptions, NormalizingMap};
//!
//! let opts = MapOptions::new().map_key(|port: u16| port.to_string());
//! let mut m: NormalizingMap<String, &str, u16> = NormalizingMap::with_options(opts);
//! m.set(80, "http").unwrap();
//! assert_eq!(m.keys().next().map(String::as_str), Some("80"));
//! ```

use crate::coerce::Hook;
use crate::error::BoxError;
use core::fmt;

/// Hooks for a [`NormalizingMap`](crate::NormalizingMap) storing `K -> V`
/// and accepting raw `RK`/`RV`.
pub struct MapOptions<K, V, RK = K, RV = V> {
    pub(crate) coerce_key: Hook<RK, K>,
    pub(crate) coerce_value: Hook<RV, V>,
}

impl<K, V> MapOptions<K, V> {
    pub fn new() -> Self {
        Self {
            coerce_key: Hook::identity(),
            coerce_value: Hook::identity(),
        }
    }
}

impl<K, V> Default for MapOptions<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, RK, RV> MapOptions<K, V, RK, RV> {
    /// Install a fallible key hook, run on every `set`/`get`/`has`/`delete`.
    pub fn coerce_key<R, F, E>(self, f: F) -> MapOptions<K, V, R, RV>
    where
        F: Fn(R) -> Result<K, E> + 'static,
        E: Into<BoxError> + 'static,
    {
        MapOptions {
            coerce_key: Hook::fallible(f),
            coerce_value: self.coerce_value,
        }
    }

    /// Install a key hook that cannot fail.
    pub fn map_key<R, F>(self, f: F) -> MapOptions<K, V, R, RV>
    where
        F: Fn(R) -> K + 'static,
    {
        MapOptions {
            coerce_key: Hook::infallible(f),
            coerce_value: self.coerce_value,
        }
    }

    /// Install a fallible value hook, run on every `set`.
    pub fn coerce_value<R, F, E>(self, f: F) -> MapOptions<K, V, RK, R>
    where
        F: Fn(R) -> Result<V, E> + 'static,
        E: Into<BoxError> + 'static,
    {
        MapOptions {
            coerce_key: self.coerce_key,
            coerce_value: Hook::fallible(f),
        }
    }

    /// Install a value hook that cannot fail.
    pub fn map_value<R, F>(self, f: F) -> MapOptions<K, V, RK, R>
    where
        F: Fn(R) -> V + 'static,
    {
        MapOptions {
            coerce_key: self.coerce_key,
            coerce_value: Hook::infallible(f),
        }
    }
}

impl<K, V, RK, RV> fmt::Debug for MapOptions<K, V, RK, RV> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions").finish_non_exhaustive()
    }
}

/// Hook for a [`NormalizingSet`](crate::NormalizingSet) storing `T` and
/// accepting raw `R`.
pub struct SetOptions<T, R = T> {
    pub(crate) coerce_value: Hook<R, T>,
}

impl<T> SetOptions<T> {
    pub fn new() -> Self {
        Self {
            coerce_value: Hook::identity(),
        }
    }
}

impl<T> Default for SetOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> SetOptions<T, R> {
    /// Install a fallible value hook, run on every `add`/`has`/`delete`.
    pub fn coerce_value<R2, F, E>(self, f: F) -> SetOptions<T, R2>
    where
        F: Fn(R2) -> Result<T, E> + 'static,
        E: Into<BoxError> + 'static,
    {
        SetOptions {
            coerce_value: Hook::fallible(f),
        }
    }

    /// Install a value hook that cannot fail.
    pub fn map_value<R2, F>(self, f: F) -> SetOptions<T, R2>
    where
        F: Fn(R2) -> T + 'static,
    {
        SetOptions {
            coerce_value: Hook::infallible(f),
        }
    }
}

impl<T, R> fmt::Debug for SetOptions<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetOptions").finish_non_exhaustive()
    }
}
