//! The capability set every eviction container implements (§4, components
//! 4-8), and the smaller concurrent variant CNDC and the wrappers implement.
//!
//! Grounded on the common shape repeated across every `numdb` container
//! header (`find`, `insert`, `maxElemCountForCapacity`, `elementSize`):
//! each one is a fixed-capacity key/value store keyed by `KeyT`, storing a
//! priority alongside each value, with an eviction policy baked into
//! `insert`'s behaviour once the container is full.

extern crate alloc;

/// Single-threaded container capability set.
///
/// Implemented by the priority hash table, the LU-strategy hash table, the
/// splay tree family, and the Weighted Search Tree. [`crate::cache::Cache`]
/// is generic over this trait.
pub trait Container<K, V> {
    /// Looks up `key`. On a hit, applies the container's policy-specific
    /// "accessed" bookkeeping (heap sift, splay, list touch) before
    /// returning the value.
    fn find(&mut self, key: &K) -> Option<&V>;

    /// Inserts `key`/`value` with the given initial priority, evicting the
    /// container's current eviction candidate first if already at capacity.
    /// Returns the evicted key/value pair, if an eviction occurred.
    fn insert(&mut self, key: K, value: V, initial_priority: u32) -> Option<(K, V)>;

    /// Removes `key` if present, returning its value.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Maximum number of entries the container can hold.
    fn capacity(&self) -> usize;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Whether the container holds zero entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Concurrent container capability set: the same operations as
/// [`Container`], but through `&self` so multiple threads may call
/// concurrently. Implemented by [`crate::cndc::Cndc`] and the
/// [`crate::wrappers`] adapters.
pub trait ConcurrentContainer<K, V> {
    /// Looks up `key`, applying the same accessed-bookkeeping as
    /// [`Container::find`].
    fn find(&self, key: &K) -> Option<V>
    where
        V: Clone;

    /// Inserts `key`/`value` with the given initial priority, evicting the
    /// container's current eviction candidate first if already at capacity.
    fn insert(&self, key: K, value: V, initial_priority: u32);

    /// Removes `key` if present, returning its value.
    fn remove(&self, key: &K) -> Option<V>;

    /// Maximum number of entries the container can hold.
    fn capacity(&self) -> usize;

    /// Current number of entries.
    fn len(&self) -> usize;

    /// Whether the container holds zero entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
