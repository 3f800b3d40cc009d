//! Exact frequency profile with top-K extraction
//!
//! Counts every recorded key exactly. Ranking is done on demand with a bounded
//! min-heap, so a report over n distinct call sites costs O(n log k).

use crate::error::ProfileError;
use crate::traits::{Profile, RankedEntry};

use core::cmp::Reverse;
use core::hash::{BuildHasherDefault, Hash};
use std::collections::{BinaryHeap, HashMap};

use xxhash_rust::xxh3::Xxh3;

type KeyHasher = BuildHasherDefault<Xxh3>;

/// Entry in the profile
#[derive(Clone, Debug)]
struct Counter<K> {
    /// The sampled location
    key: K,
    /// Occurrences in the current window
    count: u64,
}

/// Ranking order of a counter: higher count first, then earlier first appearance
type Rank = (u64, Reverse<usize>);

/// Exact frequency profile of sampled keys
///
/// Keeps one counter per distinct key together with the running total of
/// samples. Counters are stored in first-appearance order and that order breaks
/// ties when ranking: of two keys with equal counts, the one recorded first
/// ranks higher. Rankings are therefore reproducible for a given sequence of
/// records.
///
/// # Example
///
/// ```
/// use hotcode::profile::TopKProfile;
/// use hotcode::traits::Profile;
///
/// let mut profile = TopKProfile::new();
///
/// for _ in 0..3 { profile.record("A"); }
/// profile.record("B");
/// for _ in 0..2 { profile.record("C"); }
///
/// assert_eq!(profile.total(), 6);
/// assert_eq!(profile.unique_count(), 3);
/// assert_eq!(profile.top_k(2).unwrap(), vec!["A", "C"]);
/// assert_eq!(profile.occurrences(&"B"), 1);
/// ```
#[derive(Clone, Debug)]
pub struct TopKProfile<K> {
    /// Map from key to counter index
    key_to_index: HashMap<K, usize, KeyHasher>,
    /// Counters in first-appearance order
    counters: Vec<Counter<K>>,
    /// Sum of all counts
    total: u64,
    /// Highest count of any key
    max_count: u64,
}

impl<K> TopKProfile<K> {
    /// Create an empty profile
    pub fn new() -> Self {
        Self {
            key_to_index: HashMap::default(),
            counters: Vec::new(),
            total: 0,
            max_count: 0,
        }
    }

    /// Create an empty profile with room for `capacity` distinct keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            key_to_index: HashMap::with_capacity_and_hasher(capacity, KeyHasher::default()),
            counters: Vec::with_capacity(capacity),
            total: 0,
            max_count: 0,
        }
    }

    /// Number of recorded samples, repeats included
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct keys
    pub fn unique_count(&self) -> usize {
        self.counters.len()
    }

    /// Highest count of any single key, `0` when empty
    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    /// Check if nothing has been recorded since the last clear
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    /// Iterate over `(key, count)` pairs in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.counters.iter().map(|c| (&c.key, c.count))
    }

    /// Reset to the empty state
    ///
    /// Keeps allocated capacity, since the next window usually sees a similar
    /// set of call sites.
    pub fn clear(&mut self) {
        self.key_to_index.clear();
        self.counters.clear();
        self.total = 0;
        self.max_count = 0;
    }
}

impl<K: Hash + Eq + Clone> TopKProfile<K> {
    /// Record one occurrence of `key`
    ///
    /// Returns `true` iff this is the first occurrence of `key` since the
    /// profile was created or last cleared.
    pub fn record(&mut self, key: K) -> bool {
        self.record_n(key, 1)
    }

    /// Record `n` occurrences of `key` at once
    ///
    /// Recording zero occurrences is a no-op and returns `false`. Counts and
    /// the total saturate at `u64::MAX`.
    pub fn record_n(&mut self, key: K, n: u64) -> bool {
        if n == 0 {
            return false;
        }
        self.total = self.total.saturating_add(n);

        if let Some(&idx) = self.key_to_index.get(&key) {
            let counter = &mut self.counters[idx];
            counter.count = counter.count.saturating_add(n);
            self.max_count = self.max_count.max(counter.count);
            return false;
        }

        let idx = self.counters.len();
        self.counters.push(Counter {
            key: key.clone(),
            count: n,
        });
        self.key_to_index.insert(key, idx);
        self.max_count = self.max_count.max(n);
        true
    }

    /// Occurrences of `key`, `0` if never seen
    pub fn occurrences(&self, key: &K) -> u64 {
        self.key_to_index
            .get(key)
            .map(|&idx| self.counters[idx].count)
            .unwrap_or(0)
    }

    /// Check if `key` was recorded in the current window
    pub fn contains(&self, key: &K) -> bool {
        self.key_to_index.contains_key(key)
    }

    /// Fold the counts of `other` into this profile
    ///
    /// Keys new to this profile are appended in `other`'s first-appearance
    /// order, after every key already present.
    pub fn merge(&mut self, other: &Self) {
        for counter in &other.counters {
            self.record_n(counter.key.clone(), counter.count);
        }
    }

    /// The `k` highest ranked entries, best first
    pub fn top_k_entries(&self, k: usize) -> Result<Vec<RankedEntry<K>>, ProfileError> {
        if k == 0 {
            return Err(ProfileError::InvalidArgument { k });
        }

        // Min-heap of the best k ranks seen so far; its root is the weakest survivor.
        let mut heap: BinaryHeap<Reverse<Rank>> =
            BinaryHeap::with_capacity(k.min(self.counters.len()));
        for (idx, counter) in self.counters.iter().enumerate() {
            let rank = (counter.count, Reverse(idx));
            if heap.len() < k {
                heap.push(Reverse(rank));
            } else if heap.peek().is_some_and(|Reverse(weakest)| rank > *weakest) {
                heap.pop();
                heap.push(Reverse(rank));
            }
        }

        // Ascending order of Reverse<Rank> is descending rank.
        let ranked = heap.into_sorted_vec();
        Ok(ranked
            .into_iter()
            .map(|Reverse((count, Reverse(idx)))| {
                RankedEntry::new(self.counters[idx].key.clone(), count)
            })
            .collect())
    }

    /// The `k` most frequent keys, best first
    pub fn top_k(&self, k: usize) -> Result<Vec<K>, ProfileError> {
        Ok(self
            .top_k_entries(k)?
            .into_iter()
            .map(|entry| entry.key)
            .collect())
    }
}

impl<K> Default for TopKProfile<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> Profile for TopKProfile<K> {
    type Key = K;

    fn occurrences(&self, key: &K) -> u64 {
        TopKProfile::occurrences(self, key)
    }

    fn total(&self) -> u64 {
        self.total
    }

    fn unique_count(&self) -> usize {
        self.counters.len()
    }

    fn top_k_entries(&self, k: usize) -> Result<Vec<RankedEntry<K>>, ProfileError> {
        TopKProfile::top_k_entries(self, k)
    }
}

impl<K: Hash + Eq + Clone> Extend<K> for TopKProfile<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.record(key);
        }
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for TopKProfile<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut profile = Self::new();
        profile.extend(iter);
        profile
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
impl<K: serde::Serialize> serde::Serialize for TopKProfile<K> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let entries: Vec<_> = self.counters.iter().map(|c| (&c.key, c.count)).collect();

        let mut state = serializer.serialize_struct("TopKProfile", 3)?;
        state.serialize_field("total", &self.total)?;
        state.serialize_field("unique", &self.counters.len())?;
        state.serialize_field("entries", &entries)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic() {
        let mut profile = TopKProfile::<String>::new();

        profile.record("main".to_string());
        profile.record("main".to_string());
        profile.record("parse".to_string());

        assert_eq!(profile.occurrences(&"main".to_string()), 2);
        assert_eq!(profile.occurrences(&"parse".to_string()), 1);
        assert_eq!(profile.total(), 3);
        assert_eq!(profile.unique_count(), 2);
    }

    #[test]
    fn test_empty() {
        let profile = TopKProfile::<String>::new();
        assert_eq!(profile.occurrences(&"anything".to_string()), 0);
        assert_eq!(profile.total(), 0);
        assert_eq!(profile.unique_count(), 0);
        assert!(profile.is_empty());
        assert!(profile.top_k(5).unwrap().is_empty());
    }

    #[test]
    fn test_first_occurrence_flag() {
        let mut profile = TopKProfile::new();

        assert!(profile.record("a"));
        assert!(!profile.record("a"));
        assert!(profile.record("b"));

        profile.clear();
        assert!(profile.record("a"));
    }

    #[test]
    fn test_top_k() {
        let mut profile = TopKProfile::new();

        for _ in 0..100 {
            profile.record("apple");
        }
        for _ in 0..50 {
            profile.record("banana");
        }
        for _ in 0..25 {
            profile.record("cherry");
        }

        let top = profile.top_k_entries(2).unwrap();
        assert_eq!(top, vec![RankedEntry::new("apple", 100), RankedEntry::new("banana", 50)]);
    }

    #[test]
    fn test_top_k_zero_is_rejected() {
        let mut profile = TopKProfile::new();
        profile.record("a");

        assert_eq!(profile.top_k(0), Err(ProfileError::InvalidArgument { k: 0 }));
        assert_eq!(profile.total(), 1);
        assert_eq!(profile.occurrences(&"a"), 1);
    }

    #[test]
    fn test_top_k_no_padding() {
        let profile: TopKProfile<_> = ["a", "b", "c", "a"].into_iter().collect();
        assert_eq!(profile.top_k(10).unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ties_ranked_by_first_appearance() {
        let mut profile = TopKProfile::new();
        for key in ["x", "y", "z", "z", "y", "x", "w"] {
            profile.record(key);
        }

        // x, y, z all have 2; w has 1
        assert_eq!(profile.top_k(4).unwrap(), vec!["x", "y", "z", "w"]);
        assert_eq!(profile.top_k(2).unwrap(), vec!["x", "y"]);
        // Repeated reads of the same state agree
        assert_eq!(profile.top_k(4).unwrap(), profile.top_k(4).unwrap());
    }

    #[test]
    fn test_bounded_heap_matches_full_sort() {
        let mut profile = TopKProfile::new();
        for i in 0..500u64 {
            profile.record_n(i, (i * 7919) % 37);
        }

        let mut expected: Vec<(u64, u64)> = profile.iter().map(|(&k, c)| (k, c)).collect();
        // Stable sort keeps first-appearance order among ties
        expected.sort_by(|a, b| b.1.cmp(&a.1));

        for k in [1, 5, 50, 499, 1000] {
            let got: Vec<(u64, u64)> = profile
                .top_k_entries(k)
                .unwrap()
                .into_iter()
                .map(|e| (e.key, e.count))
                .collect();
            assert_eq!(got, &expected[..k.min(expected.len())]);
        }
    }

    #[test]
    fn test_record_n() {
        let mut profile = TopKProfile::new();

        assert!(!profile.record_n("a", 0));
        assert_eq!(profile.unique_count(), 0);

        assert!(profile.record_n("a", 5));
        assert!(!profile.record_n("a", 2));
        assert_eq!(profile.occurrences(&"a"), 7);
        assert_eq!(profile.total(), 7);
        assert_eq!(profile.max_count(), 7);
    }

    #[test]
    fn test_counts_saturate() {
        let mut profile = TopKProfile::new();

        profile.record_n("a", u64::MAX);
        profile.record_n("b", 1);
        profile.record("a");

        assert_eq!(profile.total(), u64::MAX);
        assert_eq!(profile.occurrences(&"a"), u64::MAX);
        assert_eq!(profile.max_count(), u64::MAX);
        assert_eq!(profile.top_k(2).unwrap(), vec!["a", "b"]);

        let other = profile.clone();
        profile.merge(&other);
        assert_eq!(profile.total(), u64::MAX);
        assert_eq!(profile.occurrences(&"b"), 2);
    }

    #[test]
    fn test_contains() {
        let mut profile = TopKProfile::new();

        profile.record("apple");

        assert!(profile.contains(&"apple"));
        assert!(!profile.contains(&"banana"));
    }

    #[test]
    fn test_merge() {
        let mut p1 = TopKProfile::new();
        let mut p2 = TopKProfile::new();

        for _ in 0..50 {
            p1.record("apple");
        }
        for _ in 0..30 {
            p2.record("banana");
        }
        p2.record("apple");

        p1.merge(&p2);

        assert_eq!(p1.occurrences(&"apple"), 51);
        assert_eq!(p1.occurrences(&"banana"), 30);
        assert_eq!(p1.total(), 81);
        assert_eq!(p1.unique_count(), 2);
        assert_eq!(p1.max_count(), 51);
    }

    #[test]
    fn test_clear() {
        let mut profile = TopKProfile::new();

        profile.record("apple");
        profile.record("banana");

        profile.clear();

        assert_eq!(profile.unique_count(), 0);
        assert_eq!(profile.total(), 0);
        assert_eq!(profile.max_count(), 0);
        assert_eq!(profile.occurrences(&"apple"), 0);
        assert!(!profile.contains(&"apple"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_summary() {
        let profile: TopKProfile<&str> = ["a", "a", "b"].into_iter().collect();
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["total"], 3);
        assert_eq!(json["unique"], 2);
        assert_eq!(json["entries"][0], serde_json::json!(["a", 2]));
    }

    #[test]
    fn test_zipf_distribution() {
        let mut profile = TopKProfile::new();

        // Site 1 is sampled 1000 times, site 2 500 times, etc.
        for rank in 1..=100u32 {
            for _ in 0..1000 / rank {
                profile.record(rank);
            }
        }

        assert_eq!(profile.top_k(5).unwrap(), vec![1, 2, 3, 4, 5]);
    }
}
