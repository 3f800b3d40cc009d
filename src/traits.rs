//! Core traits for sampling profiles
//!
//! A profile is read through [`Profile`], which is all a report needs. Sample
//! producers only see [`SampleSink`], the ingestion side, so a stack walker can
//! feed a shared profile without knowing how it is locked or ranked.

use std::sync::Arc;

use crate::error::ProfileError;

/// A key together with its occurrence count in the current window
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RankedEntry<K> {
    /// The sampled location
    pub key: K,
    /// Occurrences since the last clear
    pub count: u64,
}

impl<K> RankedEntry<K> {
    /// Create a new ranked entry
    pub fn new(key: K, count: u64) -> Self {
        Self { key, count }
    }

    /// Share of `total` held by this entry, in percent
    ///
    /// Returns `0.0` when `total` is zero.
    pub fn ratio(&self, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            100.0 * self.count as f64 / total as f64
        }
    }
}

/// Read access to an accumulated frequency profile
pub trait Profile {
    /// The sampled location type
    type Key;

    /// Occurrences of `key` since the last clear, `0` if never seen
    fn occurrences(&self, key: &Self::Key) -> u64;

    /// Number of recorded samples, repeats included
    fn total(&self) -> u64;

    /// Number of distinct keys
    fn unique_count(&self) -> usize;

    /// The `k` most frequent keys with their counts, most frequent first
    ///
    /// Returns fewer than `k` entries when fewer distinct keys exist. Fails
    /// with [`ProfileError::InvalidArgument`] when `k == 0`.
    fn top_k_entries(&self, k: usize) -> Result<Vec<RankedEntry<Self::Key>>, ProfileError>;

    /// The `k` most frequent keys, most frequent first
    fn top_k(&self, k: usize) -> Result<Vec<Self::Key>, ProfileError> {
        Ok(self
            .top_k_entries(k)?
            .into_iter()
            .map(|entry| entry.key)
            .collect())
    }

    /// Check if nothing has been recorded
    fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Ingestion side of a profile: report one observed key
///
/// Takes `&self` so one sink can be handed to several sampling threads.
pub trait SampleSink<K> {
    /// Record one occurrence of `key`
    ///
    /// Returns `true` iff `key` was not seen before in the current window.
    fn report(&self, key: K) -> bool;
}

impl<K, S: SampleSink<K> + ?Sized> SampleSink<K> for &S {
    fn report(&self, key: K) -> bool {
        (**self).report(key)
    }
}

impl<K, S: SampleSink<K> + ?Sized> SampleSink<K> for Arc<S> {
    fn report(&self, key: K) -> bool {
        (**self).report(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let entry = RankedEntry::new("a", 25);
        assert!((entry.ratio(200) - 12.5).abs() < 1e-9);
        assert_eq!(entry.ratio(0), 0.0);
    }
}
