//! Decode cache statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of decode cache counters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    /// Requests served from a populated entry
    pub hits: u64,
    /// Requests that found no entry
    pub misses: u64,
    /// Misses that waited on another caller's in-flight decode
    pub coalesced: u64,
    /// Payloads fetched and successfully decoded
    pub decodes: u64,
    /// Fetches or decodes that failed (never cached)
    pub failures: u64,
    /// Entries dropped to stay under capacity
    pub evictions: u64,
    /// In-flight decodes abandoned before completing
    pub abandoned: u64,
    /// Entries currently held
    pub entry_count: usize,
}

impl CacheStats {
    /// Hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Share of misses that piggy-backed on an in-flight decode (0.0 to 1.0).
    pub fn coalescing_ratio(&self) -> f64 {
        if self.misses == 0 {
            0.0
        } else {
            self.coalesced as f64 / self.misses as f64
        }
    }
}

/// Lock-free counters behind [`CacheStats`].
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
    decodes: AtomicU64,
    failures: AtomicU64,
    evictions: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_coalesced(&self) {
        self.coalesced.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode(&self) {
        self.decodes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_evictions(&self, count: u64) {
        self.evictions.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entry_count: usize, abandoned: u64) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
            decodes: self.decodes.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            abandoned,
            entry_count,
        }
    }
}
