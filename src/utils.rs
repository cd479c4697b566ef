//! Utility types and trait impls for `HashTable`

use crate::HashTable;

/// Summary of how entries are spread over the buckets of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketStats {
    /// Number of buckets
    pub buckets: usize,
    /// Number of entries across all buckets
    pub entries: usize,
    /// Buckets holding no entry
    pub empty_buckets: usize,
    /// Length of the longest chain
    pub longest_chain: usize,
    /// Comparisons needed to find every entry once, summed over all entries
    pub total_scan_length: usize,
}

impl BucketStats {
    /// Builds the summary from per-bucket chain lengths
    #[must_use]
    pub fn from_lengths<I>(lengths: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        lengths.into_iter().fold(Self::default(), |mut stats, len| {
            stats.buckets = stats.buckets.saturating_add(1);
            stats.entries = stats.entries.saturating_add(len);
            if len == 0 {
                stats.empty_buckets = stats.empty_buckets.saturating_add(1);
            }
            stats.longest_chain = stats.longest_chain.max(len);
            // the k-th entry of a chain is found after k comparisons
            let scan = len.saturating_mul(len.saturating_add(1)) / 2;
            stats.total_scan_length = stats.total_scan_length.saturating_add(scan);
            stats
        })
    }

    /// Average length of the non-empty chains
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_chain_length(&self) -> f64 {
        let occupied = self.buckets.saturating_sub(self.empty_buckets);
        if occupied == 0 {
            return 0.0;
        }
        self.entries as f64 / occupied as f64
    }

    /// Average number of comparisons for a lookup that hits
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_successful_scan(&self) -> f64 {
        if self.entries == 0 {
            return 0.0;
        }
        self.total_scan_length as f64 / self.entries as f64
    }
}

impl<K, V> FromIterator<(K, V)> for HashTable<V>
where
    K: Into<String>,
{
    /// Collects into a table with the default capacity; later pairs overwrite earlier
    /// ones with the same key. The table is not grown while collecting.
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut table = Self::new();
        table.extend(iter);
        table
    }
}

impl<K, V> Extend<(K, V)> for HashTable<V>
where
    K: Into<String>,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.set(key, value);
        }
    }
}
