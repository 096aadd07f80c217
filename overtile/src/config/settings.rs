//! Settings structs, one per `[section]` of the config file.

use crate::logging::{DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use crate::overzoom::OverzoomPolicy;
use crate::storage::DEFAULT_TEMPLATE;
use std::path::PathBuf;

/// Decoded tiles kept in memory. 0 means unbounded.
pub const DEFAULT_CACHE_CAPACITY: usize = 0;

/// `[source]`: where raw tiles come from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSettings {
    /// Root of a directory tile source
    pub directory: Option<PathBuf>,
    /// MBTiles archive; mutually exclusive with `directory`
    pub mbtiles: Option<PathBuf>,
    /// Path template below `directory`, with `{x}`, `{y}` and `{z}`
    pub template: String,
    /// Overrides the source's advertised maximum zoom
    pub max_zoom: Option<u8>,
    /// What to do when no maximum zoom is known
    pub unknown_max_zoom: OverzoomPolicy,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            directory: None,
            mbtiles: None,
            template: DEFAULT_TEMPLATE.to_string(),
            max_zoom: None,
            unknown_max_zoom: OverzoomPolicy::default(),
        }
    }
}

/// `[cache]`: decode cache sizing.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    pub capacity: usize,
}

impl CacheSettings {
    /// Capacity as the cache expects it, `None` when unbounded.
    pub fn capacity_limit(&self) -> Option<usize> {
        (self.capacity > 0).then_some(self.capacity)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// `[logging]`: log file location.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
