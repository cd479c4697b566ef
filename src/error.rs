//! Error type shared by the table implementations

use std::collections::TryReserveError;

use thiserror::Error;

/// Failures reported by table construction and growth.
///
/// Looking up or deleting a missing key is not an error; those operations report
/// absence through `Option`/`bool`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A table needs at least one bucket.
    #[error("Capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
    /// Doubling the bucket count would overflow `usize`.
    #[error("Capacity overflow while growing a table of {current} buckets")]
    CapacityOverflow {
        /// Bucket count before the failed resize
        current: usize,
    },
    /// The allocator refused to reserve the bucket array.
    #[error("Failed to allocate {requested} buckets")]
    AllocationFailed {
        /// Number of buckets that were requested
        requested: usize,
        /// Underlying reservation failure
        #[source]
        source: TryReserveError,
    },
}
