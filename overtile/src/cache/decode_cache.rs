//! Decode cache keyed by tile address.

use super::coalesce::{DecodeOutcome, InFlightGuard, Registration, RequestCoalescer};
use super::memory::MemoryStore;
use super::stats::{CacheStats, StatsRecorder};
use crate::coord::TileAddress;
use crate::decode::{self, VectorTile};
use crate::error::TileError;
use crate::storage::TileStorage;
use std::sync::Arc;
use tracing::{debug, warn};

/// How many times a waiter re-registers after its leader was abandoned.
const MAX_WAIT_ATTEMPTS: usize = 4;

/// Caches decoded tiles and guarantees at most one in-flight decode per
/// address.
///
/// Successful decodes are stored and shared as `Arc<VectorTile>`; every
/// caller sees the same canonical tile. Failures are delivered to all
/// callers waiting on that decode but never stored, so a later request
/// retries from storage.
pub struct DecodeCache {
    store: MemoryStore,
    coalescer: RequestCoalescer,
    stats: StatsRecorder,
}

impl DecodeCache {
    /// Creates a cache holding at most `capacity` tiles (`None` = unbounded).
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            store: MemoryStore::new(capacity),
            coalescer: RequestCoalescer::new(),
            stats: StatsRecorder::default(),
        }
    }

    /// Returns the decoded tile for `address`, fetching and decoding it from
    /// `storage` on a miss.
    ///
    /// Concurrent callers for the same address share one fetch and decode.
    /// Cancelling the caller that leads a decode does not strand the others:
    /// one of them takes over.
    ///
    /// # Errors
    ///
    /// - [`TileError::NotFound`] if storage has no payload at `address`
    /// - [`TileError::Storage`] if the fetch fails
    /// - [`TileError::Decode`] if the payload is malformed
    /// - [`TileError::Cancelled`] if leaders keep disappearing
    pub async fn get_or_decode<S>(
        &self,
        address: &TileAddress,
        storage: &S,
    ) -> Result<Arc<VectorTile>, TileError>
    where
        S: TileStorage,
    {
        if let Some(tile) = self.store.get(address) {
            self.stats.record_hit();
            return Ok(tile);
        }
        self.after_fast_miss(address, storage).await
    }

    /// Registration path taken when the unlocked store lookup missed. Each
    /// request is counted once, as a hit or a miss, on its first attempt.
    async fn after_fast_miss<S>(
        &self,
        address: &TileAddress,
        storage: &S,
    ) -> Result<Arc<VectorTile>, TileError>
    where
        S: TileStorage,
    {
        for attempt in 0..MAX_WAIT_ATTEMPTS {
            let first = attempt == 0;
            match self.coalescer.register(*address, || self.store.get(address)) {
                Registration::Cached(tile) => {
                    // Another caller stored the tile after the unlocked lookup.
                    if first {
                        self.stats.record_hit();
                    }
                    return Ok(tile);
                }
                Registration::Leader(guard) => {
                    if first {
                        self.stats.record_miss();
                    }
                    return self.lead(address, storage, guard).await;
                }
                Registration::Waiter(mut rx) => {
                    if first {
                        self.stats.record_miss();
                        self.stats.record_coalesced();
                    }
                    match rx.recv().await {
                        Ok(outcome) => return outcome,
                        Err(e) => {
                            debug!(tile = %address, attempt, error = %e, "Leader went away, re-registering");
                        }
                    }
                }
            }
        }

        warn!(tile = %address, attempts = MAX_WAIT_ATTEMPTS, "Giving up on abandoned decode");
        Err(TileError::Cancelled(*address))
    }

    /// Returns the cached tile without touching storage.
    pub fn get(&self, address: &TileAddress) -> Option<Arc<VectorTile>> {
        self.store.get(address)
    }

    pub fn contains(&self, address: &TileAddress) -> bool {
        self.store.contains(address)
    }

    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.store.capacity()
    }

    /// Number of addresses currently being decoded.
    pub fn in_flight_count(&self) -> usize {
        self.coalescer.in_flight_count()
    }

    /// Drops every stored tile. In-flight decodes are unaffected.
    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
            .snapshot(self.store.len(), self.coalescer.abandoned_count())
    }

    async fn lead<S>(
        &self,
        address: &TileAddress,
        storage: &S,
        guard: InFlightGuard<'_>,
    ) -> DecodeOutcome
    where
        S: TileStorage,
    {
        let outcome = fetch_and_decode(address, storage).await;

        match &outcome {
            Ok(tile) => {
                // Stored before the slot is released so late arrivals hit it.
                let evicted = self.store.insert(*address, Arc::clone(tile));
                self.stats.record_decode();
                if evicted > 0 {
                    self.stats.record_evictions(evicted);
                    debug!(tile = %address, evicted, "Evicted least recently used tiles");
                }
            }
            Err(e) => {
                self.stats.record_failure();
                debug!(tile = %address, error = %e, "Decode failed, not caching");
            }
        }

        guard.complete(outcome.clone());
        outcome
    }
}

impl Default for DecodeCache {
    fn default() -> Self {
        Self::new(None)
    }
}

async fn fetch_and_decode<S>(address: &TileAddress, storage: &S) -> DecodeOutcome
where
    S: TileStorage,
{
    let address = *address;
    let data = storage
        .fetch_raw_tile(&address)
        .await
        .map_err(|source| TileError::Storage { address, source })?
        .ok_or(TileError::NotFound(address))?;

    let tile = tokio::task::spawn_blocking(move || decode::decode(&data))
        .await
        .map_err(|e| {
            warn!(tile = %address, error = %e, "Decode task did not finish");
            TileError::Cancelled(address)
        })?
        .map_err(|source| TileError::Decode { address, source })?;

    Ok(Arc::new(tile))
}
