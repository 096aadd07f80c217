//! In-memory tile storage.

use super::{SourceMetadata, StorageError, TileStorage};
use crate::coord::TileAddress;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Tile storage backed by a `HashMap`.
///
/// Counts every fetch so callers can observe how often the store was hit.
/// An optional artificial latency makes concurrent requests overlap.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tiles: RwLock<HashMap<TileAddress, Vec<u8>>>,
    metadata: SourceMetadata,
    latency: Option<Duration>,
    fetches: AtomicUsize,
}

impl MemoryStorage {
    pub fn new(metadata: SourceMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Delays every fetch by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores (or replaces) the payload for `address`.
    pub fn insert(&self, address: TileAddress, data: Vec<u8>) {
        self.tiles.write().insert(address, data);
    }

    pub fn remove(&self, address: &TileAddress) -> Option<Vec<u8>> {
        self.tiles.write().remove(address)
    }

    pub fn len(&self) -> usize {
        self.tiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.read().is_empty()
    }

    /// Number of `fetch_raw_tile` calls so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl TileStorage for MemoryStorage {
    async fn fetch_raw_tile(
        &self,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        Ok(self.tiles.read().get(address).cloned())
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}
