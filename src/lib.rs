//! normalizing-collections: insertion-ordered maps and sets that normalize
//! keys and values through hooks fixed at construction.
//!
//! ```
//! use normalizing_collections::{MapOptions, NormalizingMap};
//!
//! let opts = MapOptions::new().map_key(|host: &str| host.to_ascii_lowercase());
//! let mut hosts: NormalizingMap<String, u16, &str> = NormalizingMap::with_options(opts);
//! hosts.set("Example.COM", 443)?;
//! assert_eq!(hosts.get("example.com")?, Some(&443));
//! assert!(hosts.has("EXAMPLE.com")?);
//! # Ok::<(), normalizing_collections::CoercionError>(())
//! ```
//!
//! Internal Design:
//!
//! Summary
//! - Goal: no path can put an un-normalized key or value into a collection,
//!   and callers never normalize by hand at lookup sites.
//! - Layers:
//!   - SameValueZero: the equivalence used for matching (NaN equals NaN,
//!     +0 equals -0) and a hash consistent with it.
//!   - EntryList<K, V, S>: insertion-ordered storage. Slot-map entries
//!     threaded by a doubly linked list, indexed by a hash table of slot
//!     keys. Knows nothing about hooks.
//!   - NormalizingMap / NormalizingSet: own an EntryList and their hooks;
//!     every write and lookup runs the hook first, then touches the list.
//!
//! Constraints
//! - Single-threaded: hooks are plain `Fn` closures, not `Send`.
//! - Hooks are fixed for the collection's lifetime; there is no setter.
//! - A failing hook aborts the operation before any mutation and the error
//!   goes to the caller. Nothing is logged, swallowed or retried.
//! - Iteration yields stored data verbatim and never runs a hook.
//! - Replacing the value of an existing key keeps the entry's position and
//!   its stored key; deleting keeps the relative order of the others.
//!
//! Reentrancy
//! - Hooks run before the list is borrowed, and in safe Rust a hook cannot
//!   reach `&mut` the collection it is feeding.
//! - EntryList guards its own critical sections with a debug-only
//!   reentrancy tracker; the only user code inside them is SameValueZero.
//!
//! Hashing
//! - Each entry stores its hash. Growing the index reuses it, so
//!   `SameValueZero::hash_value_zero` runs once per call that receives a key.
//!
//! Non-determinism
//! - Hooks are trusted to map equal raw inputs to equivalent outputs.
//!   Nothing checks this; a hook that does not will make lookups miss.

mod coerce;
mod entry_list;
#[cfg(test)]
mod entry_list_proptest;
pub mod error;
pub mod map;
pub mod options;
mod reentrancy;
pub mod same_value_zero;
pub mod set;

// Public surface
pub use error::{BoxError, CoercionError, ConstructionError, ExtendError};
pub use map::NormalizingMap;
pub use options::{MapOptions, SetOptions};
pub use same_value_zero::SameValueZero;
pub use set::NormalizingSet;
