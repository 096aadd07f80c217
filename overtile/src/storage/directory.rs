//! Filesystem-backed tile storage.
//!
//! Tiles live one per file under a root directory, addressed through a path
//! template with `{x}`, `{y}` and `{z}` placeholders. Source metadata is read
//! once, at open time, from the `[metadata]` section of `metadata.ini` in the
//! root.
//!
//! ```text
//! tiles/
//! ├── metadata.ini
//! └── 14/
//!     └── 8185/
//!         └── 5448.pbf
//! ```

use super::{SourceMetadata, StorageError, TileStorage};
use crate::coord::TileAddress;
use ini::Ini;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default path template relative to the storage root.
pub const DEFAULT_TEMPLATE: &str = "{z}/{x}/{y}.pbf";

/// Metadata file name inside the storage root.
pub const METADATA_FILE: &str = "metadata.ini";

/// Tile storage reading one file per tile.
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
    template: String,
    metadata: SourceMetadata,
}

impl DirectoryStorage {
    /// Opens a tile directory using [`DEFAULT_TEMPLATE`].
    ///
    /// A missing `metadata.ini` yields empty metadata.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        let metadata = load_metadata(&root.join(METADATA_FILE))?;

        debug!(
            root = %root.display(),
            max_zoom = ?metadata.max_zoom,
            "Opened tile directory"
        );

        Ok(Self {
            root,
            template: DEFAULT_TEMPLATE.to_string(),
            metadata,
        })
    }

    /// Uses a different path template, e.g. `"{z}/{x}/{y}.mvt"`.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Replaces the metadata read from disk.
    pub fn with_metadata(mut self, metadata: SourceMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `address`.
    pub fn tile_path(&self, address: &TileAddress) -> PathBuf {
        let relative = self
            .template
            .replace("{x}", &address.x.to_string())
            .replace("{y}", &address.y.to_string())
            .replace("{z}", &address.zoom.to_string());
        self.root.join(relative)
    }

    /// Copies the raw payload for `address` to `destination`, replacing any
    /// existing file.
    ///
    /// Returns `Ok(false)` if the source has no such tile.
    pub async fn extract_tile(
        &self,
        address: &TileAddress,
        destination: &Path,
    ) -> Result<bool, StorageError> {
        super::extract_tile(self, address, destination).await
    }
}

impl TileStorage for DirectoryStorage {
    async fn fetch_raw_tile(
        &self,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.tile_path(address);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        }
    }

    fn metadata(&self) -> &SourceMetadata {
        &self.metadata
    }
}

fn load_metadata(path: &Path) -> Result<SourceMetadata, StorageError> {
    if !path.exists() {
        return Ok(SourceMetadata::default());
    }

    let ini = Ini::load_from_file(path)
        .map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;

    match ini.section(Some("metadata")) {
        Some(section) => SourceMetadata::from_pairs(section.iter()),
        None => Ok(SourceMetadata::default()),
    }
}
