//! Overtile - vector tile resolution for map renderers
//!
//! Turns `(x, y, zoom)` requests into decoded vector tiles with geometry
//! normalized to the tile's unit square. Requests deeper than the source's
//! maximum zoom are served by cropping the covering ancestor tile.
//!
//! ```ignore
//! use overtile::engine::{EngineConfig, TileEngine};
//! use overtile::log::TracingLogger;
//! use overtile::storage::DirectoryStorage;
//! use std::sync::Arc;
//!
//! let storage = DirectoryStorage::open("/srv/tiles")?;
//! let engine = TileEngine::new(storage, EngineConfig::default(), Arc::new(TracingLogger));
//!
//! let tile = engine.get_vector_tile(19295, 24640, 16).await?;
//! for layer in &tile.layers {
//!     println!("{}: {} features", layer.name, layer.features.len());
//! }
//! ```

pub mod cache;
pub mod canvas;
pub mod config;
pub mod coord;
pub mod decode;
pub mod engine;
pub mod error;
pub mod log;
pub mod logging;
pub mod overzoom;
pub mod storage;

/// Version of the overtile library and CLI, from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
        assert_eq!(VERSION.split('.').count(), 3);
    }
}
