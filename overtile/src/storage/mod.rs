//! Tile storage collaborators.
//!
//! The engine never assumes a storage engine: anything that can map a tile
//! address to a raw byte blob implements [`TileStorage`]. Three backends ship
//! with the crate:
//!
//! - [`MbTilesStorage`] - an MBTiles SQLite archive
//! - [`DirectoryStorage`] - one file per tile under a `{z}/{x}/{y}` template
//! - [`MemoryStorage`] - an in-process map, handy for embedding and tests

mod directory;
mod mbtiles;
mod memory;
mod metadata;

pub use directory::{DirectoryStorage, DEFAULT_TEMPLATE, METADATA_FILE};
pub use mbtiles::MbTilesStorage;
pub use memory::MemoryStorage;
pub use metadata::SourceMetadata;

use crate::coord::TileAddress;
use std::future::Future;
use std::path::Path;
use thiserror::Error;

/// Errors reported by storage backends.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// I/O failure while reading a tile or metadata
    #[error("Storage I/O error: {0}")]
    Io(String),

    /// A metadata entry could not be parsed
    #[error("Invalid metadata: {key} = '{value}' - {reason}")]
    Metadata {
        key: String,
        value: String,
        reason: String,
    },

    /// Backend-specific failure, including caller-imposed timeouts
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// Source of raw tile payloads.
///
/// `fetch_raw_tile` resolves to `Ok(None)` when the store holds no tile at the
/// address. Implementations may block on I/O; the decode cache never holds a
/// shared lock across this call.
pub trait TileStorage: Send + Sync {
    /// Fetches the raw, possibly gzip-compressed payload for `address`.
    fn fetch_raw_tile(
        &self,
        address: &TileAddress,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, StorageError>> + Send;

    /// Describes the source. The resolver only reads `max_zoom`.
    fn metadata(&self) -> &SourceMetadata;
}

/// Copies the raw payload for `address` to `destination`, replacing any
/// existing file.
///
/// Returns `Ok(false)` and writes nothing if the source has no such tile.
pub async fn extract_tile<S>(
    storage: &S,
    address: &TileAddress,
    destination: &Path,
) -> Result<bool, StorageError>
where
    S: TileStorage,
{
    let Some(data) = storage.fetch_raw_tile(address).await? else {
        return Ok(false);
    };

    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(destination, data).await?;
    Ok(true)
}
