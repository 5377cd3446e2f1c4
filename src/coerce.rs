//! Coercion hooks: owned, boxed `raw -> normalized` functions.

use crate::error::BoxError;

/// A hook turning a raw `R` into its stored form `T`, or failing.
///
/// Hooks are fixed once a collection is built. They must finish (return or
/// fail) before the operation that called them touches the entry list.
pub(crate) struct Hook<R, T> {
    f: Box<dyn Fn(R) -> Result<T, BoxError>>,
}

impl<T> Hook<T, T> {
    pub(crate) fn identity() -> Self {
        Self {
            f: Box::new(|raw: T| -> Result<T, BoxError> { Ok(raw) }),
        }
    }
}

impl<R, T> Hook<R, T> {
    pub(crate) fn fallible<F, E>(f: F) -> Self
    where
        F: Fn(R) -> Result<T, E> + 'static,
        E: Into<BoxError> + 'static,
    {
        Self {
            f: Box::new(move |raw: R| f(raw).map_err(Into::<BoxError>::into)),
        }
    }

    pub(crate) fn infallible<F>(f: F) -> Self
    where
        F: Fn(R) -> T + 'static,
    {
        Self {
            f: Box::new(move |raw: R| Ok::<T, BoxError>(f(raw))),
        }
    }
}

impl<R, T> Hook<R, T> {
    #[inline]
    pub(crate) fn apply(&self, raw: R) -> Result<T, BoxError> {
        (self.f)(raw)
    }
}
