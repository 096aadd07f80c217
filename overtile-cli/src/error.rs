//! CLI error handling with user-facing messages.

use overtile::config::ConfigFileError;
use overtile::error::TileError;
use overtile::storage::StorageError;
use std::fmt;
use std::process;

#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read or parsed
    Config(ConfigFileError),
    /// No `--source`/`--mbtiles` flag and no `[source]` location in the config
    NoSource,
    /// Tile source could not be opened or read
    Storage(StorageError),
    /// Tile request failed
    Tile(TileError),
    /// Failed to serialize output
    Json(serde_json::Error),
}

impl CliError {
    /// Prints the error with any relevant hints and exits with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::NoSource => {
                eprintln!();
                eprintln!("Pass --source <DIR> or --mbtiles <FILE>, or set one in the config file:");
                eprintln!("  [source]");
                eprintln!("  directory = /path/to/tiles");
                eprintln!("  ; or: mbtiles = /path/to/tiles.mbtiles");
            }
            CliError::Tile(TileError::MaxZoomUnknown) => {
                eprintln!();
                eprintln!("The source advertises no maxzoom in its metadata. Either add one,");
                eprintln!("set [source] max_zoom, or use unknown_max_zoom = passthrough.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::NoSource => write!(f, "No tile source configured"),
            CliError::Storage(e) => write!(f, "Tile source error: {}", e),
            CliError::Tile(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Failed to serialize output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Storage(e) => Some(e),
            CliError::Tile(e) => Some(e),
            CliError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Storage(e)
    }
}

impl From<TileError> for CliError {
    fn from(e: TileError) -> Self {
        CliError::Tile(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}
