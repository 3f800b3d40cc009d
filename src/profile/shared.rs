//! Profile shared between sampling threads and a reporting thread

use crate::error::ProfileError;
use crate::profile::TopKProfile;
use crate::traits::{RankedEntry, SampleSink};

use core::hash::Hash;
use core::mem;

use parking_lot::Mutex;
use tracing::debug;

/// A [`TopKProfile`] behind a single mutex
///
/// Every operation takes the lock once, so a reader never sees the total
/// updated without the matching per-key count. Recording stays a hash lookup
/// plus two additions inside the critical section.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::thread;
/// use hotcode::profile::SharedProfile;
/// use hotcode::traits::SampleSink;
///
/// let profile = Arc::new(SharedProfile::new());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let sink = Arc::clone(&profile);
///         thread::spawn(move || {
///             for _ in 0..1000 {
///                 sink.report("Parser::next_token");
///             }
///         })
///     })
///     .collect();
/// for handle in handles {
///     handle.join().unwrap();
/// }
///
/// assert_eq!(profile.total(), 4000);
/// ```
#[derive(Debug)]
pub struct SharedProfile<K> {
    inner: Mutex<TopKProfile<K>>,
}

impl<K> SharedProfile<K> {
    /// Create an empty shared profile
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(TopKProfile::new()),
        }
    }

    /// Create an empty shared profile with room for `capacity` distinct keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(TopKProfile::with_capacity(capacity)),
        }
    }

    /// Number of recorded samples in the current window
    pub fn total(&self) -> u64 {
        self.inner.lock().total()
    }

    /// Number of distinct keys in the current window
    pub fn unique_count(&self) -> usize {
        self.inner.lock().unique_count()
    }

    /// Run `f` against a consistent view of the profile
    ///
    /// Producers block for as long as `f` runs, so keep it short: rank and
    /// format, then return.
    pub fn read<R>(&self, f: impl FnOnce(&TopKProfile<K>) -> R) -> R {
        f(&*self.inner.lock())
    }

    /// Empty the profile
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        debug!(
            total = inner.total(),
            unique = inner.unique_count(),
            "clearing sampling window"
        );
        inner.clear();
    }

    /// Close the current window: return its profile and start an empty one
    ///
    /// Samples are either in the returned profile or in the new window, never
    /// lost between a report and a clear.
    pub fn take(&self) -> TopKProfile<K> {
        let window = mem::take(&mut *self.inner.lock());
        debug!(
            total = window.total(),
            unique = window.unique_count(),
            "closed sampling window"
        );
        window
    }

    /// Consume the shared wrapper and return the profile
    pub fn into_inner(self) -> TopKProfile<K> {
        self.inner.into_inner()
    }
}

impl<K: Hash + Eq + Clone> SharedProfile<K> {
    /// Record one occurrence of `key`
    ///
    /// Returns `true` iff `key` is new in the current window.
    pub fn record(&self, key: K) -> bool {
        self.inner.lock().record(key)
    }

    /// Record `n` occurrences of `key`
    pub fn record_n(&self, key: K, n: u64) -> bool {
        self.inner.lock().record_n(key, n)
    }

    /// Occurrences of `key` in the current window
    pub fn occurrences(&self, key: &K) -> u64 {
        self.inner.lock().occurrences(key)
    }

    /// The `k` most frequent keys, best first
    pub fn top_k(&self, k: usize) -> Result<Vec<K>, ProfileError> {
        self.inner.lock().top_k(k)
    }

    /// The `k` highest ranked entries, best first
    pub fn top_k_entries(&self, k: usize) -> Result<Vec<RankedEntry<K>>, ProfileError> {
        self.inner.lock().top_k_entries(k)
    }

    /// Copy of the current window
    pub fn snapshot(&self) -> TopKProfile<K> {
        self.inner.lock().clone()
    }

    /// Fold a locally accumulated profile into the shared one
    pub fn merge(&self, other: &TopKProfile<K>) {
        self.inner.lock().merge(other);
    }
}

impl<K> Default for SharedProfile<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone> From<TopKProfile<K>> for SharedProfile<K> {
    fn from(profile: TopKProfile<K>) -> Self {
        Self {
            inner: Mutex::new(profile),
        }
    }
}

impl<K: Hash + Eq + Clone> SampleSink<K> for SharedProfile<K> {
    fn report(&self, key: K) -> bool {
        self.record(key)
    }
}
