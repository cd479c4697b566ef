use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::{HashTable, error::TableError, utils::BucketStats};

/// A `HashTable` that can be shared between threads.
///
/// The whole table sits behind a single mutex. Every operation, including
/// [`SharedHashTable::resize`], takes the lock for its full duration, so bucket edits and
/// the bucket-array swap during a resize never interleave.
///
/// Reads hand out clones instead of references, since a reference could not outlive the
/// lock guard.
#[derive(Debug)]
pub struct SharedHashTable<V> {
    /// The guarded table
    table: Mutex<HashTable<V>>,
}

impl<V> Default for SharedHashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<HashTable<V>> for SharedHashTable<V> {
    fn from(table: HashTable<V>) -> Self {
        Self { table: Mutex::new(table) }
    }
}

impl<V> SharedHashTable<V> {
    /// Creates an empty shared table with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::from(HashTable::new())
    }

    /// Creates an empty shared table with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Same as [`HashTable::with_capacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        HashTable::with_capacity(capacity).map(Self::from)
    }

    /// Locks the table.
    ///
    /// A panic while the lock was held cannot leave the table half-updated (no table
    /// operation unwinds between two structural edits), so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashTable<V>> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with exclusive access to the table.
    ///
    /// Use this for compound operations that must not interleave with other threads,
    /// such as reading the load factor and resizing in one step.
    pub fn with<R>(&self, f: impl FnOnce(&mut HashTable<V>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Inserts or updates a key-value pair, returning the previous value
    pub fn set(&self, key: impl Into<String>, value: V) -> Option<V> {
        self.lock().set(key, value)
    }

    /// Returns a clone of the value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.lock().get(key).cloned()
    }

    /// Returns true if `key` is present
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    /// Removes `key` and returns its value
    pub fn remove(&self, key: &str) -> Option<V> {
        self.lock().remove(key)
    }

    /// Removes `key`, returning whether it was present
    pub fn delete(&self, key: &str) -> bool {
        self.lock().delete(key)
    }

    /// Returns a snapshot of all keys
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys()
    }

    /// Returns a snapshot of all values
    #[must_use]
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.lock().values()
    }

    /// Returns a snapshot of all key-value pairs
    #[must_use]
    pub fn entries(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.lock().entries()
    }

    /// Returns the number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Returns the current load factor
    #[must_use]
    pub fn load_factor(&self) -> f64 {
        self.lock().load_factor()
    }

    /// Summarises the bucket spread
    #[must_use]
    pub fn stats(&self) -> BucketStats {
        self.lock().stats()
    }

    /// Doubles the capacity and rehashes every entry under the lock.
    ///
    /// # Errors
    ///
    /// Same as [`HashTable::resize`].
    pub fn resize(&self) -> Result<(), TableError> {
        self.lock().resize()
    }

    /// Checks the load factor and resizes under one lock acquisition.
    ///
    /// # Errors
    ///
    /// Same as [`HashTable::resize`].
    pub fn grow_if_loaded(&self, threshold: f64) -> Result<bool, TableError> {
        let grown = self.lock().grow_if_loaded(threshold)?;
        if grown {
            debug!("Shared table grew past load factor {threshold:.3}");
        }
        Ok(grown)
    }

    /// Consumes the wrapper and returns the table
    #[must_use]
    pub fn into_inner(self) -> HashTable<V> {
        self.table.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
