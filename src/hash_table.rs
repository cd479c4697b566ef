use std::{iter::FusedIterator, mem, num::NonZeroUsize, slice};

use log::{debug, warn};

use crate::{error::TableError, hasher::bucket_index, utils::BucketStats};

/// Bucket count used by [`HashTable::new`]
pub const DEFAULT_CAPACITY: usize = 16;

/// [`DEFAULT_CAPACITY`] as a bucket count
const DEFAULT_BUCKETS: NonZeroUsize = match NonZeroUsize::new(DEFAULT_CAPACITY) {
    Some(capacity) => capacity,
    None => NonZeroUsize::MIN,
};

/// Load factor above which callers conventionally grow the table
pub const DEFAULT_LOAD_FACTOR_THRESHOLD: f64 = 0.75;

/// A key-value pair stored in a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<V> {
    /// The key in the key-value pair
    key: String,
    /// The value associated with the key
    value: V,
}

/// Entries sharing one bucket index, in insertion order
type Bucket<V> = Vec<Entry<V>>;

/// A string-keyed hash table with separate chaining.
///
/// Keys are placed with the positional hash from [`crate::hasher`]. Colliding keys share a
/// bucket and are scanned linearly, in the order they were inserted.
///
/// The table never grows on its own. Callers watch [`HashTable::load_factor`] and call
/// [`HashTable::resize`] (or [`HashTable::grow_if_loaded`]) when chains get too long.
///
/// Note: This implementation is not thread-safe. For shared access, use
/// [`crate::SharedHashTable`].
#[derive(Debug, Clone)]
pub struct HashTable<V> {
    /// One bucket per index; always exactly `capacity` long
    buckets: Vec<Bucket<V>>,
    /// Current number of buckets
    capacity: NonZeroUsize,
    /// Number of entries across all buckets
    len: usize,
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`DEFAULT_CAPACITY`] buckets
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: std::iter::repeat_with(Vec::new).take(DEFAULT_CAPACITY).collect(),
            capacity: DEFAULT_BUCKETS,
            len: 0,
        }
    }

    /// Creates an empty table with `capacity` buckets.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidCapacity`] when `capacity` is zero and
    /// [`TableError::AllocationFailed`] when the bucket array cannot be reserved.
    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        let Some(capacity) = NonZeroUsize::new(capacity) else {
            warn!("Rejected hash table construction with zero buckets");
            return Err(TableError::InvalidCapacity(capacity));
        };

        Ok(Self { buckets: empty_buckets(capacity)?, capacity, len: 0 })
    }

    /// Inserts or updates a key-value pair.
    ///
    /// An existing key keeps its position in its bucket and only its value is replaced;
    /// the previous value is returned. A new key is appended to the end of its bucket.
    /// This never resizes the table.
    pub fn set(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        let bucket = self.bucket_mut(&key)?;

        if let Some(entry) = bucket.iter_mut().find(|entry| entry.key == key) {
            return Some(mem::replace(&mut entry.value, value));
        }

        bucket.push(Entry { key, value });
        self.len = self.len.saturating_add(1);
        None
    }

    /// Retrieves the value stored under `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.bucket(key)?.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
    }

    /// Retrieves a mutable reference to the value stored under `key`
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.bucket_mut(key)?
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    /// Returns true if `key` is present
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// The remaining entries of the bucket keep their relative order. Removal never
    /// shrinks the table.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let bucket = self.bucket_mut(key)?;
        let position = bucket.iter().position(|entry| entry.key == key)?;
        let entry = bucket.remove(position);
        self.len = self.len.saturating_sub(1);
        Some(entry.value)
    }

    /// Removes `key`, returning whether it was present
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key).is_some()
    }

    /// Returns an iterator over the key-value pairs.
    ///
    /// Pairs come out in bucket-index order, then insertion order within each bucket.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter { buckets: self.buckets.iter(), chain: slice::Iter::default(), remaining: self.len }
    }

    /// Returns a snapshot of all keys in iteration order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_owned()).collect()
    }

    /// Returns a snapshot of all values in iteration order
    #[must_use]
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|(_, value)| value.clone()).collect()
    }

    /// Returns a snapshot of all key-value pairs in iteration order
    #[must_use]
    pub fn entries(&self) -> Vec<(String, V)>
    where
        V: Clone,
    {
        self.iter().map(|(key, value)| (key.to_owned(), value.clone())).collect()
    }

    /// Returns the number of entries in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of buckets
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Returns the number of entries divided by the number of buckets
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn load_factor(&self) -> f64 {
        self.len as f64 / self.capacity.get() as f64
    }

    /// Removes every entry, keeping the current capacity
    pub fn clear(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
        self.len = 0;
    }

    /// Doubles the number of buckets and rehashes every entry.
    ///
    /// Entries are reinserted through [`HashTable::set`], so each one lands in the bucket
    /// its key maps to under the new capacity. Entries that shared a bucket and still
    /// collide keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::CapacityOverflow`] if the doubled capacity does not fit in a
    /// `usize` and [`TableError::AllocationFailed`] if the new bucket array cannot be
    /// reserved. The table is unchanged in both cases.
    pub fn resize(&mut self) -> Result<(), TableError> {
        let current = self.capacity;
        let new_capacity = current
            .get()
            .checked_mul(2)
            .and_then(NonZeroUsize::new)
            .ok_or(TableError::CapacityOverflow { current: current.get() })?;
        let new_buckets = empty_buckets(new_capacity)?;

        let old_buckets = mem::replace(&mut self.buckets, new_buckets);
        self.capacity = new_capacity;
        self.len = 0;

        for Entry { key, value } in old_buckets.into_iter().flatten() {
            self.set(key, value);
        }

        debug!(
            "Resized hash table from {} to {} buckets, rehashed {} entries",
            current,
            new_capacity,
            self.len
        );
        Ok(())
    }

    /// Resizes once if the load factor is strictly above `threshold`.
    ///
    /// Returns whether a resize happened. This is the caller-side growth policy; no other
    /// operation invokes it.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`HashTable::resize`].
    pub fn grow_if_loaded(&mut self, threshold: f64) -> Result<bool, TableError> {
        let load_factor = self.load_factor();
        if load_factor <= threshold {
            return Ok(false);
        }

        debug!("Load factor {load_factor:.3} exceeds {threshold:.3}, growing table");
        self.resize()?;
        Ok(true)
    }

    /// Returns the length of every bucket, in bucket-index order
    pub fn bucket_lengths(&self) -> impl Iterator<Item = usize> {
        self.buckets.iter().map(Vec::len)
    }

    /// Summarises how entries are spread across buckets
    #[must_use]
    pub fn stats(&self) -> BucketStats {
        BucketStats::from_lengths(self.bucket_lengths())
    }

    /// Returns the bucket `key` maps to under the current capacity
    fn bucket(&self, key: &str) -> Option<&Bucket<V>> {
        self.buckets.get(bucket_index(key, self.capacity))
    }

    /// Returns the bucket `key` maps to under the current capacity, mutably
    fn bucket_mut(&mut self, key: &str) -> Option<&mut Bucket<V>> {
        self.buckets.get_mut(bucket_index(key, self.capacity))
    }
}

/// Allocates `capacity` empty buckets, reporting allocator refusal instead of aborting
fn empty_buckets<V>(capacity: NonZeroUsize) -> Result<Vec<Bucket<V>>, TableError> {
    let requested = capacity.get();
    let mut buckets = Vec::new();
    buckets
        .try_reserve_exact(requested)
        .map_err(|source| TableError::AllocationFailed { requested, source })?;
    buckets.resize_with(requested, Vec::new);
    Ok(buckets)
}

/// Iterator over the key-value pairs of the hash table
#[derive(Debug, Clone)]
pub struct Iter<'a, V> {
    /// Buckets not yet visited
    buckets: slice::Iter<'a, Bucket<V>>,
    /// Remaining entries of the bucket being visited
    chain: slice::Iter<'a, Entry<V>>,
    /// Entries left to yield
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.chain.next() {
                self.remaining = self.remaining.saturating_sub(1);
                return Some((entry.key.as_str(), &entry.value));
            }
            self.chain = self.buckets.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mixed value type for the demo scenario
    #[derive(Debug, Clone, PartialEq)]
    enum Value {
        Text(&'static str),
        Number(i64),
    }

    #[test]
    fn test_demo_scenario() {
        let mut map = HashTable::new();
        map.set("name", Value::Text("John"));
        map.set("age", Value::Number(30));
        map.set("city", Value::Text("New York"));

        assert_eq!(map.get("name"), Some(&Value::Text("John")));
        assert_eq!(map.get("age"), Some(&Value::Number(30)));
        assert!(map.has("city"));
        assert!(!map.has("country"));

        // bucket order: city -> 5, name -> 11, age -> 14
        assert_eq!(map.keys(), vec!["city", "name", "age"]);
        assert_eq!(
            map.values(),
            vec![Value::Text("New York"), Value::Text("John"), Value::Number(30)]
        );
        assert_eq!(
            map.entries(),
            vec![
                ("city".to_string(), Value::Text("New York")),
                ("name".to_string(), Value::Text("John")),
                ("age".to_string(), Value::Number(30)),
            ]
        );
        assert!((map.load_factor() - 0.1875).abs() < f64::EPSILON);

        assert!(map.delete("age"));
        assert_eq!(map.get("age"), None);
        assert!((map.load_factor() - 0.125).abs() < f64::EPSILON);
    }

    #[test]
    fn test_set_and_get() {
        let mut map = HashTable::new();
        assert_eq!(map.set("key1", 1), None);
        assert_eq!(map.set("key2", 2), None);
        assert_eq!(map.set("key3".to_string(), 3), None);

        assert_eq!(map.get("key1"), Some(&1));
        assert_eq!(map.get("key2"), Some(&2));
        assert_eq!(map.get("key3"), Some(&3));
        assert_eq!(map.get("key4"), None);
    }

    #[test]
    fn test_update_keeps_count_and_position() {
        let mut map = HashTable::with_capacity(1).unwrap();
        map.set("first", 1);
        map.set("second", 2);
        assert_eq!(map.set("first", 10), Some(1));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("first"), Some(&10));
        assert_eq!(map.keys(), vec!["first", "second"]);
    }

    #[test]
    fn test_delete() {
        let mut map = HashTable::new();
        map.set("key1", 1);
        map.set("key2", 2);

        assert!(map.delete("key1"));
        assert_eq!(map.get("key1"), None);
        assert!(!map.has("key1"));
        assert_eq!(map.get("key2"), Some(&2));

        let before = map.entries();
        assert!(!map.delete("key1"));
        assert_eq!(map.entries(), before);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_returns_value() {
        let mut map = HashTable::new();
        map.set("key", String::from("value"));
        assert_eq!(map.remove("key"), Some(String::from("value")));
        assert_eq!(map.remove("key"), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_collisions_chain_in_insertion_order() {
        // 'a' = 97, 'q' = 113 and 'A' = 65 are all 1 mod 16
        let mut map = HashTable::new();
        map.set("a", 1);
        map.set("q", 2);
        map.set("A", 3);

        assert_eq!(map.keys(), vec!["a", "q", "A"]);
        assert_eq!(map.bucket_lengths().filter(|&len| len > 0).collect::<Vec<_>>(), vec![3]);

        assert!(map.delete("q"));
        assert_eq!(map.keys(), vec!["a", "A"]);
        assert_eq!(map.get("A"), Some(&3));
    }

    #[test]
    fn test_resize_splits_chains() -> Result<(), TableError> {
        let mut map = HashTable::new();
        map.set("a", 1);
        map.set("q", 2);
        map.set("A", 3);

        map.resize()?;

        // modulo 32: 'a' and 'A' stay in bucket 1, 'q' moves to 17
        assert_eq!(map.capacity(), 32);
        assert_eq!(map.keys(), vec!["a", "A", "q"]);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("q"), Some(&2));
        Ok(())
    }

    #[test]
    fn test_resize_preserves_content() -> Result<(), TableError> {
        let mut map = HashTable::with_capacity(4)?;
        for i in 0..50 {
            map.set(format!("key-{i}"), i);
        }
        let mut before = map.entries();

        map.resize()?;
        map.resize()?;

        assert_eq!(map.capacity(), 16);
        let mut after = map.entries();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        for i in 0..50 {
            assert_eq!(map.get(&format!("key-{i}")), Some(&i));
        }
        Ok(())
    }

    #[test]
    fn test_set_never_resizes() {
        let mut map = HashTable::with_capacity(2).unwrap();
        for i in 0..20 {
            map.set(i.to_string(), i);
        }
        assert_eq!(map.capacity(), 2);
        assert!((map.load_factor() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_grow_if_loaded() -> Result<(), TableError> {
        let mut map = HashTable::with_capacity(4)?;
        map.set("one", 1);
        map.set("two", 2);
        map.set("three", 3);
        assert!(!map.grow_if_loaded(DEFAULT_LOAD_FACTOR_THRESHOLD)?);

        map.set("four", 4);
        assert!(map.grow_if_loaded(DEFAULT_LOAD_FACTOR_THRESHOLD)?);
        assert_eq!(map.capacity(), 8);
        assert!((map.load_factor() - 0.5).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(HashTable::<u8>::with_capacity(0).unwrap_err(), TableError::InvalidCapacity(0));
    }

    #[test]
    fn test_unallocatable_capacity_is_reported() {
        let result = HashTable::<u8>::with_capacity(usize::MAX);
        assert!(matches!(
            result,
            Err(TableError::AllocationFailed { requested: usize::MAX, .. })
        ));
    }

    #[test]
    fn test_resize_overflow_leaves_table_intact() {
        let mut map = HashTable::<u8>::new();
        map.set("k", 1);
        map.capacity = NonZeroUsize::MAX;

        assert_eq!(map.resize(), Err(TableError::CapacityOverflow { current: usize::MAX }));
        assert_eq!(map.capacity(), usize::MAX);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_iter_matches_snapshots() {
        let mut map = HashTable::with_capacity(3).unwrap();
        for (i, key) in ["x", "yy", "zzz", "w", "vv"].into_iter().enumerate() {
            map.set(key, i);
        }

        let iter = map.iter();
        assert_eq!(iter.len(), 5);

        let keys = map.keys();
        let values = map.values();
        let entries = map.entries();
        assert_eq!(keys.len(), map.len());
        assert_eq!(values.len(), map.len());
        for (position, (key, value)) in entries.iter().enumerate() {
            assert_eq!(keys.get(position), Some(key));
            assert_eq!(values.get(position), Some(value));
        }

        let mut sum = 0;
        for (_, &value) in &map {
            sum += value;
        }
        assert_eq!(sum, 10);
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashTable::new();
        map.set("key1", 1);

        if let Some(value) = map.get_mut("key1") {
            *value += 10;
        }

        assert_eq!(map.get("key1"), Some(&11));
        assert_eq!(map.get_mut("missing"), None);
    }

    #[test]
    fn test_clear() {
        let mut map = HashTable::new();
        map.set("key1", 1);
        map.set("key2", 2);

        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.get("key1"), None);
        assert_eq!(map.keys(), Vec::<String>::new());
    }

    #[test]
    fn test_snapshots_are_detached() {
        let mut map = HashTable::new();
        map.set("key", vec![1, 2]);

        let mut values = map.values();
        if let Some(first) = values.first_mut() {
            first.push(3);
        }

        assert_eq!(map.get("key"), Some(&vec![1, 2]));
    }
}
