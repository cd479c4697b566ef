//! # Chain Table
//!
//! A string-keyed hash table built from first principles: a fixed array of buckets,
//! separate chaining for collisions and growth that only happens when the caller asks.
//!
//! This crate provides two table types:
//!
//! - `HashTable`: the single-threaded table
//! - `SharedHashTable`: the same table behind one mutex for use from several threads
//!
//! Keys are placed with a positional weighted-sum hash (see [`hasher`]). Lookups compute
//! the bucket index and then scan that bucket linearly, so the cost of every operation
//! is the length of one chain.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chaintable::HashTable;
//!
//! let mut map = HashTable::new();
//!
//! map.set("name", "John");
//! map.set("city", "New York");
//! assert_eq!(map.get("name"), Some(&"John"));
//! assert!(map.has("city"));
//!
//! // Updating keeps a single entry
//! map.set("name", "Jane");
//! assert_eq!(map.len(), 2);
//!
//! assert!(map.delete("name"));
//! assert_eq!(map.get("name"), None);
//! ```
//!
//! ## Growing the table
//!
//! The table never resizes itself. Check the load factor and resize explicitly:
//!
//! ```rust
//! use chaintable::{DEFAULT_LOAD_FACTOR_THRESHOLD, HashTable, TableError};
//!
//! let mut map = HashTable::with_capacity(4)?;
//! for i in 0..4 {
//!     map.set(format!("key-{i}"), i);
//! }
//! assert_eq!(map.load_factor(), 1.0);
//!
//! if map.load_factor() > DEFAULT_LOAD_FACTOR_THRESHOLD {
//!     map.resize()?;
//! }
//! assert_eq!(map.capacity(), 8);
//! assert_eq!(map.get("key-3"), Some(&3));
//! # Ok::<(), TableError>(())
//! ```
//!
//! ## Shared Usage
//!
//! ```rust
//! use chaintable::SharedHashTable;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let map = Arc::new(SharedHashTable::new());
//!
//! let map1 = Arc::clone(&map);
//! let map2 = Arc::clone(&map);
//!
//! let t1 = thread::spawn(move || {
//!     for i in 0..100 {
//!         map1.set(format!("key-{}", i), i);
//!     }
//! });
//!
//! let t2 = thread::spawn(move || {
//!     for i in 100..200 {
//!         map2.set(format!("key-{}", i), i);
//!     }
//! });
//!
//! t1.join().unwrap();
//! t2.join().unwrap();
//!
//! assert_eq!(map.len(), 200);
//! ```

/// Error type for construction and growth
mod error;
/// Module implementing the single-threaded chained hash table
mod hash_table;
/// Positional hash used for bucket placement
pub mod hasher;
/// Logger setup shared by the binary and tests
pub mod logger;
/// Module implementing the mutex-guarded shared table
mod shared_hash_table;
/// Utility types and trait impls for the tables
mod utils;

pub use error::TableError;
pub use hash_table::{DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR_THRESHOLD, HashTable, Iter};
pub use shared_hash_table::SharedHashTable;
pub use utils::BucketStats;
