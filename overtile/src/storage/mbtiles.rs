//! MBTiles archive storage.
//!
//! An MBTiles file is an SQLite database holding a `metadata (name, value)`
//! table and a `tiles (zoom_level, tile_column, tile_row, tile_data)` table.
//! Rows are stored bottom-up (TMS): row 0 is the southern edge, so the
//! top-down row of a [`TileAddress`] is flipped on lookup.

use super::{SourceMetadata, StorageError, TileStorage};
use crate::coord::TileAddress;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

const TILE_QUERY: &str =
    "SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3";

/// Tile storage backed by a read-only MBTiles archive.
#[derive(Debug, Clone)]
pub struct MbTilesStorage {
    path: PathBuf,
    connection: Arc<Mutex<Connection>>,
    metadata: SourceMetadata,
}

impl MbTilesStorage {
    /// Opens `path` read-only and loads its `metadata` table.
    ///
    /// # Errors
    ///
    /// Fails if the file is not an SQLite database, has no `metadata` table,
    /// or advertises malformed metadata values.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let connection = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StorageError::Backend(format!("{}: {}", path.display(), e)))?;

        let metadata = load_metadata(&connection)
            .map_err(|e| StorageError::Backend(format!("{}: {}", path.display(), e)))?;
        let metadata = SourceMetadata::from_pairs(
            metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())),
        )?;

        debug!(
            path = %path.display(),
            name = ?metadata.name,
            max_zoom = ?metadata.max_zoom,
            "Opened MBTiles archive"
        );

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(connection)),
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the metadata read from the archive.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Copies the raw payload for `address` to `destination`, replacing any
    /// existing file.
    ///
    /// Returns `Ok(false)` if the archive has no such tile.
    pub async fn extract_tile(
        &self,
        address: &TileAddress,
        destination: &Path,
    ) -> Result<bool, StorageError> {
        super::extract_tile(self, address, destination).await
    }
}

impl TileStorage for MbTilesStorage {
    async fn fetch_raw_tile(
        &self,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let connection = Arc::clone(&self.connection);
        let zoom = i64::from(address.zoom);
        let column = i64::from(address.x);
        let row = tms_row(address);

        tokio::task::spawn_blocking(move || {
            let connection = connection.lock();
            let mut statement = connection.prepare_cached(TILE_QUERY)?;
            statement
                .query_row(params![zoom, column, row], |r| r.get::<_, Vec<u8>>(0))
                .optional()
        })
        .await
        .map_err(|e| StorageError::Backend(format!("tile query did not finish: {}", e)))?
        .map_err(StorageError::from)
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

/// Bottom-up row index for `address`.
fn tms_row(address: &TileAddress) -> i64 {
    let last = address.tiles_per_axis().saturating_sub(1);
    last.saturating_sub(u64::from(address.y)) as i64
}

fn load_metadata(connection: &Connection) -> Result<Vec<(String, String)>, rusqlite::Error> {
    let mut statement = connection.prepare("SELECT name, value FROM metadata")?;
    let rows = statement.query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?;
    rows.collect()
}
