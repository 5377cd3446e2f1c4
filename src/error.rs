//! Error types surfaced by the collections.
//!
//! Hooks report failure with any error type convertible into [`BoxError`];
//! the collection wraps it with the side (key or value) that rejected the
//! input and hands it straight back to the caller.

use thiserror::Error;

/// Boxed error returned by a coercion hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A coercion hook rejected its raw input. The operation that ran the hook
/// left the collection unchanged.
#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("key coercion failed: {0}")]
    Key(#[source] BoxError),
    #[error("value coercion failed: {0}")]
    Value(#[source] BoxError),
}

impl CoercionError {
    pub fn is_key(&self) -> bool {
        matches!(self, CoercionError::Key(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, CoercionError::Value(_))
    }

    /// The hook's own error.
    pub fn into_inner(self) -> BoxError {
        match self {
            CoercionError::Key(e) | CoercionError::Value(e) => e,
        }
    }
}

/// Coercion failed while consuming the initial elements passed to a
/// constructor. No collection is returned.
#[derive(Debug, Error)]
#[error("construction aborted at initial element {index}: {source}")]
pub struct ConstructionError {
    /// Zero-based position of the rejected element in the initial iterable.
    pub index: usize,
    #[source]
    pub source: CoercionError,
}

impl ConstructionError {
    pub fn into_coercion(self) -> CoercionError {
        self.source
    }
}

/// `try_extend` stopped at element `index`; elements before it were kept.
#[derive(Debug, Error)]
#[error("extend stopped at element {index}: {source}")]
pub struct ExtendError {
    pub index: usize,
    #[source]
    pub source: CoercionError,
}
