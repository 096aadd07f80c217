//! Tile source selection shared by the commands that read tiles.

use clap::Args;
use overtile::coord::TileAddress;
use overtile::storage::{
    DirectoryStorage, MbTilesStorage, SourceMetadata, StorageError, TileStorage,
};
use std::fmt;
use std::path::{Path, PathBuf};

/// `--source` / `--mbtiles` flags. Both override the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct SourceArgs {
    /// Tile directory (overrides [source] directory)
    #[arg(long, conflicts_with = "mbtiles")]
    pub source: Option<PathBuf>,

    /// MBTiles archive (overrides [source] mbtiles)
    #[arg(long)]
    pub mbtiles: Option<PathBuf>,
}

/// Where a tile source lives, once flags and config are merged.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLocation {
    Directory(PathBuf),
    MbTiles(PathBuf),
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Directory(path) => write!(f, "directory {}", path.display()),
            SourceLocation::MbTiles(path) => write!(f, "MBTiles {}", path.display()),
        }
    }
}

/// An opened tile source of either kind.
#[derive(Debug, Clone)]
pub enum Source {
    Directory(DirectoryStorage),
    MbTiles(MbTilesStorage),
}

impl Source {
    pub fn open(location: &SourceLocation, template: &str) -> Result<Self, StorageError> {
        Ok(match location {
            SourceLocation::Directory(root) => {
                Source::Directory(DirectoryStorage::open(root)?.with_template(template))
            }
            SourceLocation::MbTiles(path) => Source::MbTiles(MbTilesStorage::open(path)?),
        })
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Source::Directory(s) => SourceLocation::Directory(s.root().to_path_buf()),
            Source::MbTiles(s) => SourceLocation::MbTiles(s.path().to_path_buf()),
        }
    }

    pub async fn extract_tile(
        &self,
        address: &TileAddress,
        destination: &Path,
    ) -> Result<bool, StorageError> {
        match self {
            Source::Directory(s) => s.extract_tile(address, destination).await,
            Source::MbTiles(s) => s.extract_tile(address, destination).await,
        }
    }
}

impl TileStorage for Source {
    async fn fetch_raw_tile(
        &self,
        address: &TileAddress,
    ) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Source::Directory(s) => s.fetch_raw_tile(address).await,
            Source::MbTiles(s) => s.fetch_raw_tile(address).await,
        }
    }

    fn metadata(&self) -> &SourceMetadata {
        match self {
            Source::Directory(s) => s.metadata(),
            Source::MbTiles(s) => s.metadata(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let directory = SourceLocation::Directory(PathBuf::from("/srv/tiles"));
        let archive = SourceLocation::MbTiles(PathBuf::from("/srv/coast.mbtiles"));
        assert_eq!(directory.to_string(), "directory /srv/tiles");
        assert_eq!(archive.to_string(), "MBTiles /srv/coast.mbtiles");
    }

    #[tokio::test]
    async fn test_directory_source_delegates() {
        let location = SourceLocation::Directory(PathBuf::from("/nonexistent/overtile-tiles"));
        let source = Source::open(&location, "{z}/{x}/{y}.mvt").unwrap();

        assert_eq!(source.location(), location);
        assert!(source.metadata().max_zoom.is_none());
        assert_eq!(
            source.fetch_raw_tile(&TileAddress::new(0, 0, 0)).await.unwrap(),
            None
        );
    }

    #[test]
    fn test_missing_archive_fails_to_open() {
        let location = SourceLocation::MbTiles(PathBuf::from("/nonexistent/overtile.mbtiles"));
        assert!(matches!(
            Source::open(&location, "{z}/{x}/{y}.pbf"),
            Err(StorageError::Backend(_))
        ));
    }
}
