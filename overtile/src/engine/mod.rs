//! Tile resolution engine.
//!
//! Entry point for renderers: resolves a requested address against the
//! source's maximum zoom, obtains the decoded tile through the decode cache
//! and, when overzooming, derives a cropped copy for the requested tile.

use crate::cache::{CacheStats, DecodeCache};
use crate::coord::TileAddress;
use crate::decode::VectorTile;
use crate::error::TileError;
use crate::log::Logger;
use crate::overzoom::{self, OverzoomPolicy, Resolution};
use crate::storage::TileStorage;
use crate::{log_debug, log_info, log_warn};
use futures::future::join_all;
use std::sync::Arc;

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Takes precedence over the source's advertised maximum zoom
    pub max_zoom_override: Option<u8>,
    /// Behaviour when neither the override nor the source gives a maximum zoom
    pub unknown_max_zoom: OverzoomPolicy,
    /// Decoded tiles kept in memory; `None` is unbounded
    pub cache_capacity: Option<usize>,
}

/// Serves decoded, possibly overzoomed, vector tiles from a storage backend.
///
/// Safe to share between tasks; wrap in an `Arc` and call
/// [`get_vector_tile`](Self::get_vector_tile) concurrently.
pub struct TileEngine<S: TileStorage> {
    storage: S,
    cache: DecodeCache,
    config: EngineConfig,
    logger: Arc<dyn Logger>,
}

impl<S: TileStorage> TileEngine<S> {
    pub fn new(storage: S, config: EngineConfig, logger: Arc<dyn Logger>) -> Self {
        let engine = Self {
            cache: DecodeCache::new(config.cache_capacity),
            storage,
            config,
            logger,
        };

        log_info!(
            engine.logger,
            "Tile engine ready: max zoom {}, unknown max zoom policy {}, cache capacity {}",
            engine
                .max_zoom()
                .map_or_else(|| "unknown".to_string(), |z| z.to_string()),
            engine.config.unknown_max_zoom,
            engine
                .config
                .cache_capacity
                .map_or_else(|| "unbounded".to_string(), |c| c.to_string()),
        );
        engine
    }

    /// Returns the decoded tile for `(x, y, zoom)`.
    ///
    /// Below or at the maximum zoom this is the cached tile itself. Deeper
    /// requests get a fresh copy of the ancestor's tile with geometry
    /// remapped to the requested footprint and
    /// [`is_over_zoomed`](VectorTile::is_over_zoomed) set; the cached ancestor
    /// is never modified.
    ///
    /// # Errors
    ///
    /// - [`TileError::InvalidAddress`] if `x` or `y` is not below `2^zoom`
    /// - [`TileError::MaxZoomUnknown`] under [`OverzoomPolicy::FailFast`]
    /// - [`TileError::NotFound`] if the resolved address has no data
    /// - [`TileError::Decode`] or [`TileError::Storage`] from the resolved fetch
    /// - [`TileError::Projection`] if the overzoom window is degenerate
    pub async fn get_vector_tile(
        &self,
        x: u32,
        y: u32,
        zoom: u8,
    ) -> Result<Arc<VectorTile>, TileError> {
        self.get_tile(&TileAddress::new(x, y, zoom)).await
    }

    /// [`get_vector_tile`](Self::get_vector_tile) taking an address.
    pub async fn get_tile(&self, requested: &TileAddress) -> Result<Arc<VectorTile>, TileError> {
        let resolution = self.resolve(requested).map_err(|e| {
            log_warn!(self.logger, "Cannot resolve tile {}: {}", requested, e);
            e
        })?;

        let tile = self
            .cache
            .get_or_decode(&resolution.effective, &self.storage)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    log_debug!(self.logger, "No data for tile {}", resolution.effective);
                } else {
                    log_warn!(self.logger, "Tile {} failed: {}", requested, e);
                }
                e
            })?;

        if !resolution.over_zoomed {
            return Ok(tile);
        }

        let mut derived = tile
            .apply_extent(&resolution.extent)
            .map_err(TileError::Projection)?;
        derived.set_over_zoomed(true);
        Ok(Arc::new(derived))
    }

    /// Resolves every address concurrently. Results keep the input order.
    pub async fn get_tiles(
        &self,
        addresses: &[TileAddress],
    ) -> Vec<Result<Arc<VectorTile>, TileError>> {
        join_all(addresses.iter().map(|address| self.get_tile(address))).await
    }

    /// Maps `requested` to the address that will be fetched, without fetching.
    pub fn resolve(&self, requested: &TileAddress) -> Result<Resolution, TileError> {
        let resolution =
            overzoom::resolve(requested, self.max_zoom(), self.config.unknown_max_zoom)?;

        if resolution.over_zoomed {
            log_debug!(
                self.logger,
                "Overzooming {} from {} window ({:.4}, {:.4}, {:.4}, {:.4})",
                requested,
                resolution.effective,
                resolution.extent.left,
                resolution.extent.top,
                resolution.extent.right,
                resolution.extent.bottom
            );
        }
        Ok(resolution)
    }

    /// Effective maximum zoom: the configured override, else the source's.
    pub fn max_zoom(&self) -> Option<u8> {
        self.config
            .max_zoom_override
            .or(self.storage.metadata().max_zoom)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops every cached decoded tile.
    pub fn clear_cache(&self) {
        self.cache.clear();
        log_debug!(self.logger, "Decode cache cleared");
    }
}
